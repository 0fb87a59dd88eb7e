/// Host-platform bridge
///
/// The product runs embedded in a messaging platform which hands the page an
/// opaque init payload (identity token plus a urlencoded user object) and a
/// color scheme. This module is the one-time, best-effort read of that
/// context at startup: nothing here is fatal, and a missing host simply
/// yields an anonymous, light-theme session.
use crate::config::Config;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const INIT_DATA_ENV: &str = "LEADLINK_INIT_DATA";
const COLOR_SCHEME_ENV: &str = "LEADLINK_COLOR_SCHEME";
const INIT_DATA_FILE: &str = ".leadlink/init_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ColorScheme::Light),
            "dark" => Some(ColorScheme::Dark),
            _ => None,
        }
    }
}

/// User object embedded in the init payload
#[derive(Debug, Clone, Deserialize)]
pub struct HostUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

pub struct HostContext {
    /// Raw init payload, forwarded verbatim as the identity header.
    /// RwLock because the host may hand us credentials after startup.
    init_data: RwLock<Option<String>>,
    pub user: Option<HostUser>,
    pub color_scheme: ColorScheme,
}

impl HostContext {
    /// Read the host context once. Never fails; missing pieces degrade.
    pub fn init(config: &Config) -> Self {
        let raw = read_init_data(config);
        let user = raw.as_deref().and_then(parse_user);

        let color_scheme = config.theme_override.or_else(host_color_scheme).unwrap_or_default();

        if let Some(u) = &user {
            debug!(user_id = u.id, "host context initialized");
        } else {
            debug!("no host context, running in anonymous mode");
        }

        Self {
            init_data: RwLock::new(raw),
            user,
            color_scheme,
        }
    }

    /// Anonymous context (tests, CLI without a host)
    pub fn detached() -> Self {
        Self {
            init_data: RwLock::new(None),
            user: None,
            color_scheme: ColorScheme::Light,
        }
    }

    pub async fn init_data(&self) -> Option<String> {
        self.init_data.read().await.clone()
    }

    /// Identity arriving after startup is accepted; the API gateway reads
    /// it per call rather than caching it.
    pub async fn set_init_data(&self, raw: String) {
        *self.init_data.write().await = Some(raw);
    }

    /// Greeting name for the dashboard header
    pub fn display_name(&self) -> String {
        match &self.user {
            Some(u) => u.first_name.clone(),
            None => "Guest".to_string(),
        }
    }
}

fn read_init_data(config: &Config) -> Option<String> {
    if let Ok(raw) = std::env::var(INIT_DATA_ENV) {
        if !raw.trim().is_empty() {
            return Some(raw.trim().to_string());
        }
    }

    let path = config.init_data_path.clone().or_else(|| {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(INIT_DATA_FILE))
    })?;

    match std::fs::read_to_string(&path) {
        Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        Ok(_) => None,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read init data from {}: {}", path.display(), e);
            }
            None
        }
    }
}

fn host_color_scheme() -> Option<ColorScheme> {
    std::env::var(COLOR_SCHEME_ENV)
        .ok()
        .and_then(|s| ColorScheme::parse(&s))
}

/// The init payload is a query string whose `user` field is a urlencoded
/// JSON object. Anything malformed degrades to anonymous.
fn parse_user(init_data: &str) -> Option<HostUser> {
    for pair in init_data.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == "user" {
                let decoded = urlencoding::decode(value).ok()?;
                match serde_json::from_str::<HostUser>(&decoded) {
                    Ok(user) => return Some(user),
                    Err(e) => {
                        warn!("Unparseable user object in init data: {}", e);
                        return None;
                    }
                }
            }
        }
    }
    None
}
