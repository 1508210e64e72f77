//! # Domain Failover
//!
//! Keeps a client reachable when the domain it was loaded from goes dark.
//!
//! ## Flow
//!
//! 1. A session sends `CHECK_DOMAIN`
//! 2. [`ConfigStore`] returns the candidate list, fresh or cached
//! 3. [`FailoverSelector`] probes the current domain, then each candidate
//!    in list order, broadcasting progress through a [`Notifier`]
//! 4. The first reachable domain wins; if it differs from the current one
//!    the requester gets `REDIRECT_REQUIRED`
//!
//! `REFRESH_CONFIG` only runs step 2, which rewrites the durable cache when
//! the network delivers a usable list.

mod config_store;
mod engine;
mod errors;
mod events;
mod messages;
mod notifier;
mod probe;
mod selector;
mod types;

pub use config_store::{choose_snapshot, ConfigStore, DEFAULT_FETCH_TIMEOUT};
pub use engine::{FailoverEngine, HandleOutcome};
pub use errors::{FailoverError, FailoverResult};
pub use events::ProgressEvent;
pub use messages::{CheckStatus, InboundMessage, OutboundMessage};
pub use notifier::{
    DeliveryReport, Notifier, RecordingNotifier, SessionHub, SessionReceiver, SessionSender,
};
pub use probe::{
    HttpProbe, ProbeSettings, Prober, DEFAULT_PROBE_PATH, DEFAULT_PROBE_SCHEME,
    DEFAULT_PROBE_TIMEOUT,
};
pub use selector::FailoverSelector;
pub use types::{CandidateList, ConfigSnapshot, ProbeResult, Provenance, SelectionOutcome};
