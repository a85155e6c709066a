//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors from building, validating or loading a LUT.
#[derive(Debug, Error)]
pub enum LutError {
    /// Grid size is too small or does not match the entry count.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// Domain is empty, inverted or not finite on some channel.
    #[error("invalid LUT domain on channel {channel}: [{min}, {max}]")]
    InvalidDomain {
        /// Channel index (0 = R)
        channel: usize,
        /// Minimum value
        min: f32,
        /// Maximum value
        max: f32,
    },

    /// A grid entry is NaN or infinite.
    #[error("non-finite LUT entry at index {0}")]
    NonFinite(usize),

    /// Malformed `.cube` content.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
