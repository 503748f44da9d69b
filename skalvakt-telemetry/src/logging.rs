//! ## skalvakt-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! Subscriber installation for controller processes. The filter comes from
//! `RUST_LOG` when set, otherwise from the configured default level.

use skalvakt_config::TelemetryConfig;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Install the global subscriber with an `info` fallback filter.
    pub fn init() {
        Self::init_with_level("info")
    }

    /// Install the global subscriber, falling back to the configured level
    /// when `RUST_LOG` is not set.
    pub fn init_from(config: &TelemetryConfig) {
        Self::init_with_level(&config.logging.level)
    }

    fn init_with_level(level: &str) {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .init()
    }

    /// Emit a structured controller event.
    pub fn log_event(event_type: &str, message: &str) {
        tracing::info!(event_type, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        EventLogger::log_event("reconcile", "Scaled object reconciled");
        assert!(logs_contain("Scaled object reconciled"));
    }
}
