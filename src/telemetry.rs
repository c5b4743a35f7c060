//! Logging setup for binaries.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the embedding program. [`init_logging`] is what the `folio` binary uses.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingSettings};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "FOLIO_LOG";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{0}': {1}")]
    InvalidFilter(String, String),

    #[error("Failed to init subscriber: {0}")]
    Init(String),
}

/// Build the filter: `FOLIO_LOG` when set, otherwise the configured level.
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|e| TelemetryError::InvalidFilter(settings.level.clone(), e.to_string())),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// rendered artifacts.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), TelemetryError> {
    let filter = env_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match settings.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))
}
