//! # Session Wire Protocol
//!
//! JSON messages exchanged with foreground sessions. Outbound shapes follow
//! the page protocol the sessions already speak:
//!
//! ```text
//! {"type":"USING_CACHED"}
//! {"type":"DOMAIN_CHECK","status":"checking","domain":"a.example.com"}
//! {"type":"REDIRECT","domain":"b.example.com"}
//! {"type":"REDIRECT_REQUIRED","domain":"b.example.com"}
//! ```

use serde::{Deserialize, Serialize};

use super::errors::{FailoverError, FailoverResult};
use super::events::ProgressEvent;

/// Control message from a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    /// Run a failover selection for the session's current domain
    CheckDomain,
    /// Repopulate the candidate list cache, no probing
    RefreshConfig,
}

impl InboundMessage {
    /// Parse one text frame
    pub fn parse(text: &str) -> FailoverResult<Self> {
        serde_json::from_str(text).map_err(|e| FailoverError::InvalidMessage(e.to_string()))
    }
}

/// Probe phase carried by `DOMAIN_CHECK`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Checking,
    Success,
    Failed,
}

/// Message to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    UsingCached,
    DomainCheck { status: CheckStatus, domain: String },
    Redirect { domain: String },
    /// Point-to-point reply to the session that asked
    RedirectRequired { domain: String },
    Error { code: String, message: String },
}

impl OutboundMessage {
    pub fn error(err: &FailoverError) -> Self {
        OutboundMessage::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    /// Serialize to a text frame
    pub fn to_json(&self) -> FailoverResult<String> {
        serde_json::to_string(self).map_err(|e| FailoverError::InvalidMessage(e.to_string()))
    }
}

impl From<ProgressEvent> for OutboundMessage {
    fn from(event: ProgressEvent) -> Self {
        match event {
            ProgressEvent::UsingCached => OutboundMessage::UsingCached,
            ProgressEvent::Checking { domain } => OutboundMessage::DomainCheck {
                status: CheckStatus::Checking,
                domain,
            },
            ProgressEvent::CheckSucceeded { domain } => OutboundMessage::DomainCheck {
                status: CheckStatus::Success,
                domain,
            },
            ProgressEvent::CheckFailed { domain } => OutboundMessage::DomainCheck {
                status: CheckStatus::Failed,
                domain,
            },
            ProgressEvent::Redirect { domain } => OutboundMessage::Redirect { domain },
        }
    }
}
