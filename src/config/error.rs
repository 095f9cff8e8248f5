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
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Pattern history limit must be at least 2, got {0}")]
    PatternHistoryTooSmall(usize),

    #[error("Profile refresh interval must be positive, got {0} days")]
    InvalidRefreshInterval(i64),

    #[error("Default markup must be a non-negative number")]
    InvalidMarkup,

    #[error("Default cost range is invalid: min {min} must be non-negative and not exceed max {max}")]
    InvalidCostRange { min: f64, max: f64 },

    #[error("Size ratio clamp is invalid: need 0 < min ({min}) <= max ({max})")]
    InvalidSizeRatio { min: f64, max: f64 },

    #[error("Invalid log filter directive: {0}")]
    InvalidLogFilter(String),
}
