//! Error types for configuration loading and validation.

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors surfaced while loading or validating controller configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested configuration file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// One or more configuration fields failed validation.
    #[error("configuration failed validation:\n{}", render_field_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// The configuration sources could not be parsed or merged.
    #[error("configuration could not be parsed: {0}")]
    Parsing(#[from] figment::Error),
}

fn render_field_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors.iter() {
            let reason = match &error.message {
                Some(message) => message.to_string(),
                None => error.code.to_string(),
            };
            let _ = writeln!(output, "{}: {}", field, reason);
        }
    }
    output
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
