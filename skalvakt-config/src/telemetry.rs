//! Observability and monitoring configuration.
//!
//! Parameters for controller instrumentation:
//! - Structured log filtering
//! - Metrics recording

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Telemetry configuration.
#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TelemetryConfig {
    /// Structured logging parameters.
    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// Structured logging parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is not set
    /// (trace, debug, info, warn, or error).
    #[serde(default = "default_level")]
    #[validate(custom(function = validation::validate_log_level))]
    pub level: String,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}
