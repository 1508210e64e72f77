//! Metrics registry for the switcher
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters
///
/// All counters use Relaxed atomics; readers only need eventually
/// consistent totals.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Failover selections started
    failover_runs: AtomicU64,
    /// Probes issued
    probes_attempted: AtomicU64,
    /// Probes that resolved unreachable
    probes_failed: AtomicU64,
    /// Candidate lists served fresh from the network
    config_fresh: AtomicU64,
    /// Candidate lists served from the durable cache
    config_cached: AtomicU64,
    /// Lookups where neither tier had a usable list
    config_unavailable: AtomicU64,
    /// REDIRECT_REQUIRED replies sent
    redirects_issued: AtomicU64,
    /// Refresh-only requests handled
    refreshes: AtomicU64,
    /// Sessions opened since start
    sessions_opened: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_failover_runs(&self) {
        self.failover_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_probes_attempted(&self) {
        self.probes_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_probes_failed(&self) {
        self.probes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_config_fresh(&self) {
        self.config_fresh.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_config_cached(&self) {
        self.config_cached.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_config_unavailable(&self) {
        self.config_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_redirects(&self) {
        self.redirects_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_refreshes(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sessions_opened(&self) {
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            failover_runs: self.failover_runs.load(Ordering::Relaxed),
            probes_attempted: self.probes_attempted.load(Ordering::Relaxed),
            probes_failed: self.probes_failed.load(Ordering::Relaxed),
            config_fresh: self.config_fresh.load(Ordering::Relaxed),
            config_cached: self.config_cached.load(Ordering::Relaxed),
            config_unavailable: self.config_unavailable.load(Ordering::Relaxed),
            redirects_issued: self.redirects_issued.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            sessions_opened: self.sessions_opened.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub failover_runs: u64,
    pub probes_attempted: u64,
    pub probes_failed: u64,
    pub config_fresh: u64,
    pub config_cached: u64,
    pub config_unavailable: u64,
    pub redirects_issued: u64,
    pub refreshes: u64,
    pub sessions_opened: u64,
}
