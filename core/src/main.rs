/// LeadLink TUI - Main entry point
use leadlink_core::api::ApiClient;
use leadlink_core::services::Services;
use leadlink_core::{app, Config, HostContext};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing. Default to warn: stderr shares the terminal
    // with the TUI, so routine logs go through RUST_LOG opt-in only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse configuration
    let args: Vec<String> = env::args().collect();
    let config = Config::from_args(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // One-time, best-effort host context read
    let host = Arc::new(HostContext::init(&config));

    info!("Starting LeadLink client");
    info!("   Backend: {}", config.base_url);
    info!("   User: {}", host.display_name());

    let api = Arc::new(ApiClient::new(&config, host.clone())?);
    let services = Arc::new(Services::new(api));

    app::run(services, host).await
}
