//! # HTTP Client
//!
//! Thin request/response abstraction over the network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::redirect::Policy;

use super::errors::{FetchError, FetchResult};

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

/// An outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Request method
    pub method: Method,

    /// Absolute URL
    pub url: String,

    /// Ask intermediaries not to serve a cached copy
    pub bypass_cache: bool,

    /// Per-request timeout, if any
    pub timeout: Option<Duration>,
}

impl FetchRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            bypass_cache: false,
            timeout: None,
        }
    }

    /// Create a HEAD request
    pub fn head(url: impl Into<String>) -> Self {
        Self {
            method: Method::Head,
            url: url.into(),
            bypass_cache: false,
            timeout: None,
        }
    }

    /// Bypass intermediate caches
    pub fn no_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body (empty for HEAD)
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network fetch collaborator.
///
/// Implementations return `Ok` for every completed exchange regardless of
/// status, and `Err` only when no response was obtained.
#[async_trait]
pub trait HttpClient: Send + Sync + std::fmt::Debug {
    /// Perform a single request
    async fn fetch(&self, request: FetchRequest) -> FetchResult<FetchResponse>;
}

/// `reqwest`-backed client
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client that never follows redirects
    pub fn new() -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(concat!("domain-switcher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn fetch(&self, request: FetchRequest) -> FetchResult<FetchResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
        };

        let mut builder = self.client.request(method, &request.url);
        if request.bypass_cache {
            builder = builder
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        let body = match request.method {
            Method::Head => Vec::new(),
            Method::Get => response.bytes().await?.to_vec(),
        };

        Ok(FetchResponse { status, body })
    }
}
