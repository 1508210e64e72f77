//! Observability for the switcher
//!
//! - Structured JSON logging
//! - Typed lifecycle events
//! - Atomic counters exported over HTTP
//!
//! Observability is read-only: nothing here changes a failover decision,
//! and a failed log write is dropped silently.
//!
//! # Usage
//!
//! ```ignore
//! use domain_switcher::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::ProbeUnreachable, &[("domain", "a.example.com")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_probes_attempted();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
