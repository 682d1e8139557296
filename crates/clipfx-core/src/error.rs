//! Error types for ClipFx.

use thiserror::Error;

/// Main error type for ClipFx operations.
#[derive(Error, Debug)]
pub enum ClipFxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Shader compilation error: {0}")]
    Shader(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("LUT error: {0}")]
    Lut(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for ClipFx operations.
pub type Result<T> = std::result::Result<T, ClipFxError>;
