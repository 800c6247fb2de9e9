//! Tracing subscriber setup for binaries embedding the crate

use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = EnvFilter::DEFAULT_ENV;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `default_directive`.
///
/// # Errors
///
/// Returns `Error::Config` if the directive is invalid or a global subscriber
/// is already installed.
///
/// # Example
/// ```rust,no_run
/// sqlguard::logging::init_tracing("sqlguard=info").unwrap();
/// ```
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), default_directive)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to initialize logging: {}", e)))
}

fn build_filter(from_env: Option<&str>, default_directive: &str) -> Result<EnvFilter> {
    let directives = match from_env {
        Some(value) if !value.trim().is_empty() => value,
        _ => default_directive,
    };
    EnvFilter::try_new(directives)
        .map_err(|e| Error::Config(format!("invalid log filter '{}': {}", directives, e)))
}
