//! # Failover Engine
//!
//! Dispatches session control messages. `CHECK_DOMAIN` runs a selection
//! whose progress is broadcast to every session; a redirect reply goes to
//! the requesting session alone, behind its progress events.

use std::sync::Arc;

use super::config_store::ConfigStore;
use super::errors::FailoverResult;
use super::messages::{InboundMessage, OutboundMessage};
use super::notifier::SessionHub;
use super::selector::FailoverSelector;
use super::types::{ConfigSnapshot, SelectionOutcome};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

/// What handling one inbound message produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// A selection ran; `redirected` is set when the requester was told to move
    Checked {
        outcome: SelectionOutcome,
        redirected: bool,
    },
    /// The cache was repopulated (or the attempt failed)
    Refreshed { provenance: Option<&'static str> },
}

/// Session-facing entry point of the failover core
pub struct FailoverEngine {
    selector: FailoverSelector,
    hub: Arc<SessionHub>,
    metrics: Arc<MetricsRegistry>,
}

impl FailoverEngine {
    pub fn new(
        selector: FailoverSelector,
        hub: Arc<SessionHub>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            selector,
            hub,
            metrics,
        }
    }

    pub fn hub(&self) -> &Arc<SessionHub> {
        &self.hub
    }

    pub fn selector(&self) -> &FailoverSelector {
        &self.selector
    }

    pub fn config_store(&self) -> &Arc<ConfigStore> {
        self.selector.config_store()
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Handle one control message from `session_id`, whose page was served
    /// from `current_domain`.
    pub async fn handle(
        &self,
        session_id: &str,
        current_domain: &str,
        message: InboundMessage,
    ) -> HandleOutcome {
        match message {
            InboundMessage::CheckDomain => {
                let outcome = self
                    .selector
                    .select_working_domain(current_domain, self.hub.as_ref())
                    .await;
                let redirected = self.reply_redirect(session_id, current_domain, &outcome);
                HandleOutcome::Checked {
                    outcome,
                    redirected,
                }
            }
            InboundMessage::RefreshConfig => {
                let provenance = self.refresh().await.ok().map(|s| s.provenance.as_str());
                HandleOutcome::Refreshed { provenance }
            }
        }
    }

    /// Repopulate the cache without probing; the snapshot is only returned
    /// for reporting.
    pub async fn refresh(&self) -> FailoverResult<ConfigSnapshot> {
        self.metrics.increment_refreshes();
        let snapshot = self.config_store().get_fresh_or_cached().await;

        let provenance = match &snapshot {
            Ok(s) => s.provenance.as_str(),
            Err(_) => "unavailable",
        };
        log_event_with_fields(Event::ConfigRefreshed, &[("provenance", provenance)]);

        snapshot
    }

    fn reply_redirect(&self, session_id: &str, current: &str, outcome: &SelectionOutcome) -> bool {
        let Some(target) = outcome.redirect_target(current) else {
            return false;
        };

        let message = OutboundMessage::RedirectRequired {
            domain: target.to_string(),
        };

        match self.hub.send_to(session_id, message) {
            Ok(()) => {
                self.metrics.increment_redirects();
                log_event_with_fields(
                    Event::RedirectIssued,
                    &[("session", session_id), ("from", current), ("to", target)],
                );
                true
            }
            Err(e) => {
                log_event_with_fields(
                    Event::SessionRejected,
                    &[("session", session_id), ("code", e.code())],
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_store::{BlobStore, MemoryBlobStore};
    use crate::failover::probe::Prober;
    use crate::failover::types::ProbeResult;
    use crate::net::{FetchRequest, FetchResponse, FetchResult, HttpClient};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const URL: &str = "https://primary.example.com/domains.json";

    #[derive(Debug)]
    struct CountingClient {
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpClient for CountingClient {
        async fn fetch(&self, _request: FetchRequest) -> FetchResult<FetchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FetchResponse::new(200, self.body))
        }
    }

    struct OnlyReaches(&'static str, AtomicUsize);

    #[async_trait]
    impl Prober for OnlyReaches {
        async fn probe(&self, domain: &str) -> ProbeResult {
            self.1.fetch_add(1, Ordering::SeqCst);
            (domain == self.0).into()
        }
    }

    struct Fixture {
        engine: FailoverEngine,
        blobs: Arc<MemoryBlobStore>,
        prober: Arc<OnlyReaches>,
    }

    fn fixture(body: &'static str, reachable: &'static str) -> Fixture {
        let metrics = Arc::new(MetricsRegistry::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let client = Arc::new(CountingClient {
            body,
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(ConfigStore::new(client, blobs.clone(), URL, metrics.clone()));
        let prober = Arc::new(OnlyReaches(reachable, AtomicUsize::new(0)));
        let selector = FailoverSelector::new(store, prober.clone(), metrics.clone());
        let engine = FailoverEngine::new(selector, Arc::new(SessionHub::new()), metrics);

        Fixture {
            engine,
            blobs,
            prober,
        }
    }

    fn drain(rx: &mut crate::failover::SessionReceiver) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn test_redirect_goes_to_requester_only() {
        let f = fixture(r#"["b.example.com"]"#, "b.example.com");
        let mut requester = f.engine.hub().connect("s1");
        let mut other = f.engine.hub().connect("s2");

        let handled = f
            .engine
            .handle("s1", "d.example.com", InboundMessage::CheckDomain)
            .await;

        assert_eq!(
            handled,
            HandleOutcome::Checked {
                outcome: SelectionOutcome::Found("b.example.com".into()),
                redirected: true,
            }
        );

        let mine = drain(&mut requester);
        let theirs = drain(&mut other);

        assert_eq!(
            mine.last(),
            Some(&OutboundMessage::RedirectRequired {
                domain: "b.example.com".into()
            })
        );
        // Progress is broadcast, the redirect reply is not
        assert_eq!(theirs.len(), mine.len() - 1);
        assert_eq!(&mine[..theirs.len()], &theirs[..]);
    }

    #[tokio::test]
    async fn test_no_redirect_when_current_is_reachable() {
        let f = fixture(r#"["b.example.com"]"#, "d.example.com");
        let mut rx = f.engine.hub().connect("s1");

        let handled = f
            .engine
            .handle("s1", "d.example.com", InboundMessage::CheckDomain)
            .await;

        assert_eq!(
            handled,
            HandleOutcome::Checked {
                outcome: SelectionOutcome::Found("d.example.com".into()),
                redirected: false,
            }
        );
        assert!(!drain(&mut rx)
            .iter()
            .any(|m| matches!(m, OutboundMessage::RedirectRequired { .. })));
        assert_eq!(f.engine.metrics().snapshot().redirects_issued, 0);
    }

    #[tokio::test]
    async fn test_refresh_writes_cache_without_probing() {
        let f = fixture(r#"["b.example.com"]"#, "b.example.com");
        let mut rx = f.engine.hub().connect("s1");

        let handled = f
            .engine
            .handle("s1", "d.example.com", InboundMessage::RefreshConfig)
            .await;

        assert_eq!(handled, HandleOutcome::Refreshed { provenance: Some("fresh") });
        assert_eq!(
            f.blobs.get(URL).await.unwrap().unwrap(),
            br#"["b.example.com"]"#.to_vec()
        );
        assert_eq!(f.prober.1.load(Ordering::SeqCst), 0);
        assert!(drain(&mut rx).is_empty());
        assert_eq!(f.engine.metrics().snapshot().refreshes, 1);
    }

    #[tokio::test]
    async fn test_requester_gone_before_reply() {
        let f = fixture(r#"["b.example.com"]"#, "b.example.com");

        let handled = f
            .engine
            .handle("ghost", "d.example.com", InboundMessage::CheckDomain)
            .await;

        assert_eq!(
            handled,
            HandleOutcome::Checked {
                outcome: SelectionOutcome::Found("b.example.com".into()),
                redirected: false,
            }
        );
    }
}
