//! Tracing setup for the service binaries.
//!
//! Filtering honors `RUST_LOG` when present and otherwise falls back to the
//! configured `APP_LOG_LEVEL`. Output is compact, single line, ANSI-free.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { value: String, source: ParseError },
    Install(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { value, .. } => {
                write!(f, "'{}' is not a valid tracing filter", value)
            }
            TelemetryError::Install(err) => {
                write!(f, "tracing subscriber could not be installed: {}", err)
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::Install(err) => Some(&**err),
        }
    }
}

/// Install the global subscriber. Call once at startup; a second call
/// reports `Install` rather than panicking.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(config)?,
    };

    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(TelemetryError::Install)
}

fn configured_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidFilter {
        value: config.log_level.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn accepts_level_and_directive_filters() {
        assert!(configured_filter(&config("debug")).is_ok());
        assert!(configured_filter(&config("info,dealscope=trace")).is_ok());
    }

    #[test]
    fn rejects_an_unparseable_filter() {
        match configured_filter(&config("not a real filter")) {
            Err(TelemetryError::InvalidFilter { value, .. }) => {
                assert_eq!(value, "not a real filter");
            }
            other => panic!("expected an invalid filter error, got {other:?}"),
        }
    }
}
