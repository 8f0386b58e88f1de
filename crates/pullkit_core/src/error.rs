//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating a [`Configuration`](crate::Configuration)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read configuration from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document is not valid TOML or has unknown values
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be written as TOML
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Explicit trigger height is zero, negative, or not finite
    #[error("Trigger height must be a positive finite number, got {0}")]
    InvalidTriggerHeight(f32),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
