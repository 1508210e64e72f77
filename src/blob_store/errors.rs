//! # Blob Store Errors

use thiserror::Error;

/// Result type for blob store operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Blob store errors
#[derive(Debug, Clone, Error)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Checksum mismatch for key: {0}")]
    ChecksumMismatch(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for BlobError {
    fn from(e: std::io::Error) -> Self {
        BlobError::Io(e.to_string())
    }
}
