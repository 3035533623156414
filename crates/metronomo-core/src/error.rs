//! Core error types for metronomo-core.
//!
//! Invalid run parameters are rejected synchronously before any run state
//! is created; a tick that arrives for a stopped or superseded run is not
//! an error at all and is discarded by the driver.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for metronomo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration storage errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Run parameter validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections produced when validating a [`crate::RunConfig`].
///
/// Detected in `start` before any state mutation; a run never begins with
/// an invalid parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A numeric field was zero or missing.
    #[error("'{field}' must be a positive number")]
    NotPositive { field: &'static str },

    /// `beats_per_cycle` outside the accepted set.
    #[error("{got} beats per cycle is not supported (accepted: 2, 4 or 8)")]
    UnsupportedBeats { got: u32 },
}

/// Configuration storage errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
