//! # Failover Errors
//!
//! None of these escape as a crash: the selector turns every one of them
//! into `NotFound`, `unreachable` or a per-session delivery miss.

use thiserror::Error;

use crate::blob_store::BlobError;
use crate::net::FetchError;

/// Result type for failover operations
pub type FailoverResult<T> = Result<T, FailoverError>;

/// Failover errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FailoverError {
    // ==================
    // Configuration Errors
    // ==================
    /// Neither the network nor the durable cache produced a usable list
    #[error("No usable candidate list available")]
    ConfigUnavailable,

    /// Document is not JSON at all
    #[error("Candidate list is not valid JSON: {0}")]
    InvalidJson(String),

    /// Document is JSON but not a non-empty array of strings
    #[error("Malformed candidate list: {0}")]
    MalformedConfig(String),

    /// Network fetch of the document failed
    #[error("Candidate list fetch failed: {0}")]
    FetchFailed(String),

    /// Network fetch completed with a non-success status
    #[error("Candidate list fetch returned status {0}")]
    BadStatus(u16),

    /// Durable cache read or write failed
    #[error("Cache storage error: {0}")]
    Storage(String),

    // ==================
    // Session Errors
    // ==================
    /// Inbound control message could not be understood
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Session is not (or no longer) connected
    #[error("Session not connected: {0}")]
    SessionNotFound(String),
}

impl FailoverError {
    /// Stable code for logs and error replies
    pub fn code(&self) -> &'static str {
        match self {
            FailoverError::ConfigUnavailable => "SWITCHER_CONFIG_UNAVAILABLE",
            FailoverError::InvalidJson(_) => "SWITCHER_CONFIG_INVALID_JSON",
            FailoverError::MalformedConfig(_) => "SWITCHER_CONFIG_MALFORMED",
            FailoverError::FetchFailed(_) => "SWITCHER_CONFIG_FETCH_FAILED",
            FailoverError::BadStatus(_) => "SWITCHER_CONFIG_BAD_STATUS",
            FailoverError::Storage(_) => "SWITCHER_CACHE_STORAGE",
            FailoverError::InvalidMessage(_) => "SWITCHER_INVALID_MESSAGE",
            FailoverError::SessionNotFound(_) => "SWITCHER_SESSION_NOT_FOUND",
        }
    }
}

impl From<FetchError> for FailoverError {
    fn from(e: FetchError) -> Self {
        FailoverError::FetchFailed(e.to_string())
    }
}

impl From<BlobError> for FailoverError {
    fn from(e: BlobError) -> Self {
        FailoverError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for FailoverError {
    fn from(e: serde_json::Error) -> Self {
        FailoverError::InvalidJson(e.to_string())
    }
}
