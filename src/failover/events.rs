//! # Progress Events
//!
//! The ordered record of one selection run. Events are handed to a
//! [`Notifier`](super::notifier::Notifier) as they happen and are never
//! stored or re-sent.

use std::fmt;

/// One moment in a selection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Candidates come from the durable cache, not the network
    UsingCached,
    /// About to probe `domain`
    Checking { domain: String },
    /// `domain` answered
    CheckSucceeded { domain: String },
    /// `domain` did not answer in time
    CheckFailed { domain: String },
    /// Clients should move to `domain`
    Redirect { domain: String },
}

impl ProgressEvent {
    pub fn checking(domain: &str) -> Self {
        ProgressEvent::Checking {
            domain: domain.to_string(),
        }
    }

    pub fn succeeded(domain: &str) -> Self {
        ProgressEvent::CheckSucceeded {
            domain: domain.to_string(),
        }
    }

    pub fn failed(domain: &str) -> Self {
        ProgressEvent::CheckFailed {
            domain: domain.to_string(),
        }
    }

    pub fn redirect(domain: &str) -> Self {
        ProgressEvent::Redirect {
            domain: domain.to_string(),
        }
    }

    /// Event kind name
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::UsingCached => "USING_CACHED",
            ProgressEvent::Checking { .. } => "CHECKING",
            ProgressEvent::CheckSucceeded { .. } => "CHECK_SUCCEEDED",
            ProgressEvent::CheckFailed { .. } => "CHECK_FAILED",
            ProgressEvent::Redirect { .. } => "REDIRECT",
        }
    }

    /// Domain the event refers to, if any
    pub fn domain(&self) -> Option<&str> {
        match self {
            ProgressEvent::UsingCached => None,
            ProgressEvent::Checking { domain }
            | ProgressEvent::CheckSucceeded { domain }
            | ProgressEvent::CheckFailed { domain }
            | ProgressEvent::Redirect { domain } => Some(domain),
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.domain() {
            Some(domain) => write!(f, "{} {}", self.kind(), domain),
            None => write!(f, "{}", self.kind()),
        }
    }
}
