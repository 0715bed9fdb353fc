//! Structured logging setup
//!
//! Level is configurable via the RUST_LOG env var (default: info). The
//! terminal front end logs to a file so it does not draw over the UI.

use crate::infra::config::Config;
use anyhow::{anyhow, Context};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr
pub fn init_stderr(json: bool) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if json { builder.json().try_init() } else { builder.try_init() };
    result.map_err(|e| anyhow!(e))
}

/// Append logs to the configured log file
pub fn init_file(config: &Config) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())
        .with_context(|| format!("Failed to open log file {}", config.log_file()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    let result = if config.log_json() { builder.json().try_init() } else { builder.try_init() };
    result.map_err(|e| anyhow!(e))
}
