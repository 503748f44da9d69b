//! # Skalvakt Configuration System
//!
//! Hierarchical configuration management for the Skalvakt autoscaling
//! controller components.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Runtime validation of critical parameters
//! - **Environment Awareness**: File and environment variable layering

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use telemetry::LoggingConfig;
pub use telemetry::TelemetryConfig;

/// Top-level configuration container for all Skalvakt components.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct SkalvaktConfig {
    /// Telemetry and observability configuration.
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl SkalvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/skalvakt.yaml` - Base settings. If missing, defaults are used.
    /// 3. `SKALVAKT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Start with defaults.
        let mut figment = Figment::from(Serialized::defaults(SkalvaktConfig::default()));

        if Path::new("config/skalvakt.yaml").exists() {
            figment = figment.merge(Yaml::file("config/skalvakt.yaml"));
        }

        figment
            .merge(Env::prefixed("SKALVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Figment::from(Serialized::defaults(SkalvaktConfig::default()))
            .merge(Yaml::file(path))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_are_valid() {
        let config = SkalvaktConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.telemetry.logging.level, "info");
    }

    #[test]
    fn load_from_path_overrides_level() {
        let path = write_temp_config(
            "skalvakt-config-level.yaml",
            "telemetry:\n  logging:\n    level: debug\n",
        );
        let config = SkalvaktConfig::load_from_path(&path).unwrap();
        assert_eq!(config.telemetry.logging.level, "debug");
    }

    #[test]
    fn load_from_path_missing_file() {
        let result = SkalvaktConfig::load_from_path("does/not/exist.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn malformed_yaml_is_a_parsing_error() {
        let path = write_temp_config(
            "skalvakt-config-malformed.yaml",
            "telemetry:\n  logging: [not, a, mapping\n",
        );
        let result = SkalvaktConfig::load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::Parsing(_))));
    }

    #[test]
    fn invalid_level_is_rejected() {
        let path = write_temp_config(
            "skalvakt-config-bad-level.yaml",
            "telemetry:\n  logging:\n    level: shout\n",
        );
        let result = SkalvaktConfig::load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
