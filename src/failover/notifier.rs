//! # Notifier
//!
//! Fan-out of selection progress to connected sessions.
//!
//! Every session owns one unbounded channel. A broadcast pushes into each
//! channel in turn without awaiting, so per-session order equals emission
//! order and a dead session only costs its own delivery.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use tokio::sync::mpsc;

use super::errors::{FailoverError, FailoverResult};
use super::events::ProgressEvent;
use super::messages::OutboundMessage;

/// Message sender for a session
pub type SessionSender = mpsc::UnboundedSender<OutboundMessage>;

/// Message receiver for a session
pub type SessionReceiver = mpsc::UnboundedReceiver<OutboundMessage>;

/// Receives selector progress as it happens
pub trait Notifier: Send + Sync {
    fn broadcast(&self, event: &ProgressEvent);
}

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Sessions the message was queued for
    pub delivered: usize,
    /// Sessions whose channel was already closed
    pub failed: usize,
}

/// Registry of connected sessions
#[derive(Debug, Default)]
pub struct SessionHub {
    sessions: RwLock<HashMap<String, SessionSender>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. Only messages sent after this call reach it.
    pub fn connect(&self, session_id: impl Into<String>) -> SessionReceiver {
        let (tx, rx) = mpsc::unbounded_channel();

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.into(), tx);
        }

        rx
    }

    pub fn disconnect(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    /// Point-to-point delivery to one session
    pub fn send_to(&self, session_id: &str, message: OutboundMessage) -> FailoverResult<()> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| FailoverError::SessionNotFound(session_id.to_string()))?;

        let sender = sessions
            .get(session_id)
            .ok_or_else(|| FailoverError::SessionNotFound(session_id.to_string()))?;

        sender
            .send(message)
            .map_err(|_| FailoverError::SessionNotFound(session_id.to_string()))
    }

    /// Queue `message` for every connected session
    pub fn broadcast_message(&self, message: &OutboundMessage) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut closed = Vec::new();

        {
            let sessions = match self.sessions.read() {
                Ok(s) => s,
                Err(_) => return report,
            };

            for (id, sender) in sessions.iter() {
                match sender.send(message.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(_) => {
                        report.failed += 1;
                        closed.push(id.clone());
                    }
                }
            }
        }

        if !closed.is_empty() {
            if let Ok(mut sessions) = self.sessions.write() {
                for id in &closed {
                    sessions.remove(id);
                }
            }
        }

        report
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

impl Notifier for SessionHub {
    fn broadcast(&self, event: &ProgressEvent) {
        self.broadcast_message(&OutboundMessage::from(event.clone()));
    }
}

/// Collects events in emission order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything broadcast so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn broadcast(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
