//! Color subsystem errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("invalid LUT format: {0}")]
    InvalidLut(String),
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("image decode error: {0}")]
    Decode(String),
}

impl From<ColorError> for clipfx_core::ClipFxError {
    fn from(e: ColorError) -> Self {
        clipfx_core::ClipFxError::Lut(e.to_string())
    }
}
