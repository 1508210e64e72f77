//! # Probe
//!
//! One bounded-time reachability check per call. A probe only asks whether
//! an HTTP exchange with the domain completes: any status counts as
//! reachable, any transport failure or timeout as unreachable. There are no
//! retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::types::ProbeResult;
use crate::net::{FetchRequest, HttpClient};
use crate::observability::{log_event_with_fields, Event};

/// Canonical probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Well-known path every participating domain serves
pub const DEFAULT_PROBE_PATH: &str = "/sw.js";

/// Scheme used to reach candidate domains
pub const DEFAULT_PROBE_SCHEME: &str = "https";

/// Reachability check for a single domain
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, domain: &str) -> ProbeResult;
}

/// How check URLs are built and how long a probe may take
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub scheme: String,
    pub path: String,
    pub timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_PROBE_SCHEME.to_string(),
            path: DEFAULT_PROBE_PATH.to_string(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// HEAD-request probe over an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Arc<dyn HttpClient>,
    settings: ProbeSettings,
}

impl HttpProbe {
    pub fn new(client: Arc<dyn HttpClient>, settings: ProbeSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Check URL for `domain`
    pub fn check_url(&self, domain: &str) -> String {
        format!("{}://{}{}", self.settings.scheme, domain, self.settings.path)
    }

    /// Probe `domain`, giving up after `timeout`.
    ///
    /// On timeout the in-flight request future is dropped, which cancels it.
    pub async fn probe_with_timeout(&self, domain: &str, timeout: Duration) -> ProbeResult {
        let request = FetchRequest::head(self.check_url(domain))
            .no_cache()
            .with_timeout(timeout);

        match tokio::time::timeout(timeout, self.client.fetch(request)).await {
            Ok(Ok(response)) => {
                let status = response.status.to_string();
                log_event_with_fields(
                    Event::ProbeReachable,
                    &[("domain", domain), ("status", &status)],
                );
                ProbeResult::Reachable
            }
            Ok(Err(e)) => {
                log_event_with_fields(
                    Event::ProbeUnreachable,
                    &[("domain", domain), ("reason", e.kind())],
                );
                ProbeResult::Unreachable
            }
            Err(_) => {
                log_event_with_fields(
                    Event::ProbeUnreachable,
                    &[("domain", domain), ("reason", "timeout")],
                );
                ProbeResult::Unreachable
            }
        }
    }
}

#[async_trait]
impl Prober for HttpProbe {
    async fn probe(&self, domain: &str) -> ProbeResult {
        self.probe_with_timeout(domain, self.settings.timeout).await
    }
}
