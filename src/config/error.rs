//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Request body limit of {0} bytes is too small")]
    InvalidBodyLimit(usize),

    #[error("Invalid engine setting: {0} must be greater than zero")]
    InvalidEngineSetting(&'static str),

    #[error("Emergency hotline cannot be empty")]
    EmptyHotline,

    #[error("Delivery attempts must be between 1 and 10")]
    InvalidDeliveryAttempts,

    #[error("Invalid AI base URL")]
    InvalidAiBaseUrl,
}
