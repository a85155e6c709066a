//! Error types for rawlog-core.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors from constructing core containers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Width or height is zero, or the sample count overflows.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Sample vector length does not match `width * height * 3`.
    #[error("data length mismatch: expected {expected} samples, got {got}")]
    DataLength {
        /// Expected sample count
        expected: usize,
        /// Actual sample count
        got: usize,
    },
}

impl CoreError {
    /// Creates an [`InvalidDimensions`](CoreError::InvalidDimensions) error.
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

/// Number of RGB samples for a `width × height` raster.
pub(crate) fn sample_count(width: u32, height: u32) -> CoreResult<usize> {
    if width == 0 || height == 0 {
        return Err(CoreError::invalid_dimensions(width, height, "zero-sized image"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| CoreError::invalid_dimensions(width, height, "sample count overflows"))
}
