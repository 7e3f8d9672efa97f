//! Tracing subscriber setup.

use crate::error::ServerError;
use roomkey_core::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
///
/// Fails on an unparsable filter or if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| ServerError::Logging(format!("invalid filter '{}': {e}", config.filter)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
    .map_err(|e| ServerError::Logging(e.to_string()))
}
