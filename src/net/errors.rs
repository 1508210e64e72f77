//! # Fetch Errors

use thiserror::Error;

/// Result type for network fetches
pub type FetchResult<T> = Result<T, FetchError>;

/// Network-level fetch failures.
///
/// A response with any HTTP status is not an error here; only exchanges
/// that never completed are.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Request did not complete within its timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection could not be established (DNS, refused, TLS)
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(String),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response body could not be read
    #[error("Failed to read body: {0}")]
    Body(String),
}

impl FetchError {
    /// Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::Connect(_) => "connect",
            FetchError::Request(_) => "request",
            FetchError::InvalidUrl(_) => "invalid_url",
            FetchError::Body(_) => "body",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}
