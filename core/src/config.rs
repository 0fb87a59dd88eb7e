/// Configuration management
use crate::error::{ClientError, Result};
use crate::host::ColorScheme;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (without the /api prefix)
    pub base_url: String,

    /// Fixed timeout applied to every outbound call
    pub request_timeout: Duration,

    /// Optional file to read the host init payload from
    /// (defaults to `$HOME/.leadlink/init_data` when present)
    pub init_data_path: Option<PathBuf>,

    /// Explicit theme override; `None` defers to the host context
    pub theme_override: Option<ColorScheme>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            init_data_path: None,
            theme_override: None,
        }
    }
}

impl Config {
    /// Create config from command line arguments
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut base_url: Option<String> = None;
        let mut timeout_ms: Option<u64> = None;
        let mut init_data_path: Option<PathBuf> = None;
        let mut theme_override: Option<ColorScheme> = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--timeout-ms" => {
                    let v = args.get(i + 1).ok_or_else(|| {
                        ClientError::Config("--timeout-ms requires a value".to_string())
                    })?;
                    timeout_ms = Some(v.parse::<u64>().map_err(|_| {
                        ClientError::Config("--timeout-ms must be a number".to_string())
                    })?);
                    i += 2;
                }
                "--init-data" => {
                    let path = args.get(i + 1).ok_or_else(|| {
                        ClientError::Config("--init-data requires a path argument".to_string())
                    })?;
                    init_data_path = Some(PathBuf::from(path));
                    i += 2;
                }
                "--theme" => {
                    let v = args.get(i + 1).ok_or_else(|| {
                        ClientError::Config("--theme requires `light` or `dark`".to_string())
                    })?;
                    theme_override = Some(
                        ColorScheme::parse(v)
                            .ok_or_else(|| ClientError::Config(format!("Unknown theme: {}", v)))?,
                    );
                    i += 2;
                }
                other if other.starts_with("--") => {
                    return Err(ClientError::Config(format!(
                        "Unknown flag: {} (usage: {} [base_url] [--timeout-ms <n>] [--init-data <path>] [--theme light|dark])",
                        other,
                        args.first().map(|s| s.as_str()).unwrap_or("leadlink")
                    )));
                }
                other => {
                    if base_url.is_some() {
                        return Err(ClientError::Config(format!(
                            "Unexpected argument: {}",
                            other
                        )));
                    }
                    base_url = Some(other.to_string());
                    i += 1;
                }
            }
        }

        // Env overrides (nice for scripts)
        if let Ok(url) = std::env::var("LEADLINK_BASE_URL") {
            if !url.is_empty() {
                base_url = Some(url);
            }
        }
        if let Some(ms) = std::env::var("LEADLINK_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            timeout_ms = Some(ms);
        }

        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "Base URL must start with http:// or https://: {}",
                base_url
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            init_data_path,
            theme_override,
        })
    }
}
