/// LeadLink - terminal client for the lead inbox backend
///
/// A thin REST client with per-view state machines: dashboard, clients,
/// unified inbox, chat, attention triage, automations and integrations.

pub mod api;
pub mod app;
pub mod cli_app;
pub mod config;
pub mod error;
pub mod host;
pub mod inbox;
pub mod services;
pub mod types;
pub mod views;

pub use config::Config;
pub use error::{ClientError, Result};
pub use host::HostContext;
