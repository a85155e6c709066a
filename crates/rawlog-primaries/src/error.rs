//! Error types for color space lookup and matrix derivation.

use thiserror::Error;

/// Result alias for primaries operations.
pub type PrimariesResult<T> = Result<T, PrimariesError>;

/// Errors from the color space table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PrimariesError {
    /// The requested name is not in the table.
    #[error("unsupported color space: {0}")]
    UnsupportedColorSpace(String),

    /// Primaries are collinear and span no gamut.
    #[error("degenerate primaries for {0}: RGB to XYZ matrix is singular")]
    Degenerate(&'static str),
}
