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

    #[error("Invalid plan API URL: {0}")]
    InvalidApiUrl(String),

    #[error("Invalid request timeout (must be 1..=300 seconds)")]
    InvalidTimeout,

    #[error("Default set count must be at least 1")]
    InvalidDefaultSetCount,

    #[error("Cache max_entries must be at least 1 when the cache is enabled")]
    InvalidCacheCapacity,

    #[error("Top muscle group count must be at least 1")]
    InvalidTopMuscleGroups,

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),
}
