//! Error types for the stipple core.

use thiserror::Error;

/// Errors produced by core constructors and conversions.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Width or height was zero when wrapping a pixel buffer.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A pixel buffer's length did not match `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),
}
