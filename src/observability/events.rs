//! Observable events for the switcher
//!
//! Every line the switcher logs outside of an [`ObservationScope`] names one
//! of these events.
//!
//! [`ObservationScope`]: super::ObservationScope

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Server bound and accepting sessions
    Serving,
    /// Server stopped
    ShutdownComplete,

    // Configuration
    /// Switcher configuration file loaded
    ConfigLoaded,
    /// Candidate list fetched from the network
    ConfigFetchFresh,
    /// Network fetch of the candidate list failed or was unusable
    ConfigFetchFailed,
    /// Falling back to the persisted candidate list
    ConfigFallbackCached,
    /// No usable candidate list from either tier
    ConfigUnavailable,
    /// Persisting the fresh candidate list failed
    ConfigPersistFailed,
    /// Refresh-only request finished
    ConfigRefreshed,

    // Probing
    /// Probe completed an exchange
    ProbeReachable,
    /// Probe failed or timed out
    ProbeUnreachable,

    // Sessions
    /// Foreground session connected
    SessionConnected,
    /// Foreground session closed
    SessionClosed,
    /// Session sent something that is not a control message
    SessionRejected,
    /// Session told to move to another domain
    RedirectIssued,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "SWITCHER_STARTUP_BEGIN",
            Event::Serving => "SWITCHER_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigFetchFresh => "CONFIG_FETCH_FRESH",
            Event::ConfigFetchFailed => "CONFIG_FETCH_FAILED",
            Event::ConfigFallbackCached => "CONFIG_FALLBACK_CACHED",
            Event::ConfigUnavailable => "CONFIG_UNAVAILABLE",
            Event::ConfigPersistFailed => "CONFIG_PERSIST_FAILED",
            Event::ConfigRefreshed => "CONFIG_REFRESHED",

            Event::ProbeReachable => "PROBE_REACHABLE",
            Event::ProbeUnreachable => "PROBE_UNREACHABLE",

            Event::SessionConnected => "SESSION_CONNECTED",
            Event::SessionClosed => "SESSION_CLOSED",
            Event::SessionRejected => "SESSION_MESSAGE_REJECTED",
            Event::RedirectIssued => "REDIRECT_ISSUED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            // The fresh list is still served, but the cache no longer follows it
            Event::ConfigPersistFailed => Severity::Error,
            Event::ConfigFetchFailed | Event::ConfigUnavailable | Event::SessionRejected => {
                Severity::Warn
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
