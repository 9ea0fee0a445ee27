//! Error types for paintbrush.
//!
//! A source that is not loaded yet is not an error: see
//! [`Loaded::NotReady`](crate::filters::buffer::Loaded).

use thiserror::Error;

/// Paintbrush error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An override value could not be parsed as its option's type
    #[error("invalid parameter {key}={value:?}: {reason}")]
    InvalidParameter {
        key: String,
        value: String,
        reason: String,
    },

    /// Hex color string is not 3 or 6 hex digits
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    /// Raw data length does not match the declared dimensions
    #[error("dimension mismatch: expected {expected} bytes, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Pixel index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The external raster source failed to produce pixels
    #[error("source error: {0}")]
    Source(String),
}

/// Result type alias for paintbrush operations
pub type Result<T> = std::result::Result<T, Error>;
