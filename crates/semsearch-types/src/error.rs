//! Error types for semsearch configuration.

use thiserror::Error;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
