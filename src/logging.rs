//! Structured logging for the collection service
//!
//! Wraps `tracing` with provider-tagged helpers so every fetch failure is
//! logged with its request context and a failure classification before
//! the error is handed back to the caller.

use crate::model::{CollectError, DataSource, TransportError};
use std::fmt;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Subscriber
// ---------------------------------------------------------------------------

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` is used
/// (e.g. `"energy_weather_collect=info"`). Safe to call more than once.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Provider asked us to slow down (HTTP 429)
    Throttled,
    /// Provider refused this particular request (other 4xx) - bad key,
    /// coordinates outside coverage, unknown facet
    Rejected,
    /// Service degradation, network trouble, or a response shape we don't understand
    Unexpected,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Throttled => write!(f, "THROTTLED"),
            FailureType::Rejected => write!(f, "REJECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
        }
    }
}

pub fn classify_failure(err: &CollectError) -> FailureType {
    match err {
        CollectError::Transport(TransportError::Status { status: 429, .. }) => FailureType::Throttled,
        CollectError::Transport(TransportError::Status { status, .. }) if (400..500).contains(status) => {
            FailureType::Rejected
        }
        CollectError::Transport(_) | CollectError::Parse(_) => FailureType::Unexpected,
    }
}

// ---------------------------------------------------------------------------
// Structured logging helpers
// ---------------------------------------------------------------------------

/// Log a failed fetch with its classification. Never swallows: callers
/// return the error right after.
pub fn log_fetch_failure(source: DataSource, context: &str, operation: &str, err: &CollectError) {
    let failure_type = classify_failure(err);
    match failure_type {
        FailureType::Unexpected => tracing::error!(
            source = %source,
            context,
            failure = %failure_type,
            error = %err,
            "{} failed",
            operation
        ),
        FailureType::Throttled | FailureType::Rejected => tracing::warn!(
            source = %source,
            context,
            failure = %failure_type,
            error = %err,
            "{} failed",
            operation
        ),
    }
}

/// Log the size of a normalized batch.
pub fn log_batch_summary(source: DataSource, kind: &str, context: &str, records: usize) {
    if records == 0 {
        tracing::warn!(source = %source, kind, context, "provider returned no records");
    } else {
        tracing::info!(source = %source, kind, context, records, "normalized batch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> CollectError {
        CollectError::Transport(TransportError::Status {
            status: code,
            url: "https://api.weather.gov/points/0,0".to_string(),
        })
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(classify_failure(&status(429)), FailureType::Throttled);
        assert_eq!(classify_failure(&status(404)), FailureType::Rejected);
        assert_eq!(classify_failure(&status(403)), FailureType::Rejected);
        assert_eq!(classify_failure(&status(500)), FailureType::Unexpected);
        assert_eq!(
            classify_failure(&CollectError::Transport(TransportError::Network("timed out".into()))),
            FailureType::Unexpected
        );
        assert_eq!(
            classify_failure(&CollectError::Parse("missing gridId".into())),
            FailureType::Unexpected
        );
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging("energy_weather_collect=debug");
        init_logging("energy_weather_collect=debug");
        log_batch_summary(DataSource::Eia, "demand", "US48", 0);
    }
}
