//! Error types for file boundaries.

use std::io;
use thiserror::Error;

/// Decode, encode or filesystem failure.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Extension or sample layout the decoder does not handle.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// RAW decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// TIFF, JPEG or ICC encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Decoded data does not describe a valid image.
    #[error("invalid image: {0}")]
    Buffer(#[from] rawlog_core::CoreError),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
