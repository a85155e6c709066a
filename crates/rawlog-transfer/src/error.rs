//! Transfer error types.

use thiserror::Error;

/// Result alias for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// Errors from the log space registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The requested log space is not registered.
    #[error("unsupported log space: {0}")]
    UnsupportedLogSpace(String),
}
