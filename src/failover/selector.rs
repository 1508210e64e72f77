//! # Failover Selector
//!
//! Decides which domain a client should use next.
//!
//! The current domain is probed first and wins whenever it answers. After
//! that the candidate list is walked in document order, skipping entries
//! equal to the current domain, and the first reachable candidate ends
//! the run. Probes never overlap within one run, so a run takes at most
//! `timeout * (1 + candidates)`.

use std::sync::Arc;

use super::config_store::ConfigStore;
use super::events::ProgressEvent;
use super::notifier::Notifier;
use super::probe::Prober;
use super::types::SelectionOutcome;
use crate::observability::{MetricsRegistry, ObservationScope};

/// Runs failover selections against a shared config store and prober
pub struct FailoverSelector {
    config_store: Arc<ConfigStore>,
    prober: Arc<dyn Prober>,
    metrics: Arc<MetricsRegistry>,
}

impl FailoverSelector {
    pub fn new(
        config_store: Arc<ConfigStore>,
        prober: Arc<dyn Prober>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            config_store,
            prober,
            metrics,
        }
    }

    pub fn config_store(&self) -> &Arc<ConfigStore> {
        &self.config_store
    }

    /// Pick the first reachable domain for a client on `current`.
    ///
    /// Progress goes to `notifier` in emission order. Without a candidate
    /// list nothing is probed and the outcome is `NotFound`.
    pub async fn select_working_domain(
        &self,
        current: &str,
        notifier: &dyn Notifier,
    ) -> SelectionOutcome {
        self.metrics.increment_failover_runs();
        let scope = ObservationScope::with_fields("FAILOVER", &[("current", current)]);

        let snapshot = match self.config_store.get_fresh_or_cached().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                scope.fail(e.code());
                return SelectionOutcome::NotFound;
            }
        };

        if snapshot.is_cached() {
            notifier.broadcast(&ProgressEvent::UsingCached);
        }

        if self.check(current, notifier).await {
            scope.complete_with_fields(&[("outcome", "found"), ("domain", current)]);
            return SelectionOutcome::Found(current.to_string());
        }

        for candidate in snapshot.candidates.iter().filter(|d| *d != current) {
            if self.check(candidate, notifier).await {
                notifier.broadcast(&ProgressEvent::redirect(candidate));
                scope.complete_with_fields(&[("outcome", "found"), ("domain", candidate)]);
                return SelectionOutcome::Found(candidate.to_string());
            }
        }

        scope.complete_with_fields(&[("outcome", "not_found")]);
        SelectionOutcome::NotFound
    }

    /// One CHECKING / result pair around a single probe
    async fn check(&self, domain: &str, notifier: &dyn Notifier) -> bool {
        notifier.broadcast(&ProgressEvent::checking(domain));
        self.metrics.increment_probes_attempted();

        let reachable = self.prober.probe(domain).await.is_reachable();

        if reachable {
            notifier.broadcast(&ProgressEvent::succeeded(domain));
        } else {
            self.metrics.increment_probes_failed();
            notifier.broadcast(&ProgressEvent::failed(domain));
        }

        reachable
    }
}
