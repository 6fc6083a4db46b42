//! Error types for the dispatch engine

use thiserror::Error;

/// Result type alias for the dispatch engine
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Main error type for the dispatch engine
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The run was stopped through its cancellation token
    #[error("Dispatch cancelled")]
    Cancelled,
}
