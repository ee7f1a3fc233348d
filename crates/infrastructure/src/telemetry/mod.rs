//! Logging setup
//!
//! Installs the global `tracing` subscriber: an `EnvFilter` (from `RUST_LOG`
//! or the configured default) and a fmt layer writing either human-readable
//! lines or one JSON object per event.

use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str =
    "languagecoach_server=info,presentation_http=info,application=info,infrastructure=info,ai_core=info,ai_speech=info,tower_http=info";

/// Errors while installing the subscriber
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already set
    #[error("Failed to initialize logging: {0}")]
    Init(String),

    /// The filter directive does not parse
    #[error("Invalid log filter: {0}")]
    Filter(String),
}

/// Build the filter from `RUST_LOG`, falling back to `default_filter`
pub fn env_filter(default_filter: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| TelemetryError::Filter(e.to_string())),
    }
}

/// Install the global subscriber
pub fn init_logging(format: LogFormat, default_filter: &str) -> Result<(), TelemetryError> {
    let filter = env_filter(default_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    }
    .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(?format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn invalid_filter_is_reported() {
        let err = EnvFilter::try_new("app=notalevel").map_err(|e| TelemetryError::Filter(e.to_string()));
        assert!(matches!(err, Err(TelemetryError::Filter(_))));
    }

    #[test]
    fn second_init_fails_cleanly() {
        let _ = init_logging(LogFormat::Text, "info");
        let second = init_logging(LogFormat::Json, "info");
        assert!(matches!(second, Err(TelemetryError::Init(_))));
    }
}
