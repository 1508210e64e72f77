//! # Failover Data Model

use serde::Serialize;

use super::errors::{FailoverError, FailoverResult};

/// Ordered, non-empty list of fallback domains.
///
/// Order is the order of the configuration document. Duplicates are kept;
/// the selector only skips entries equal to the current domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateList(Vec<String>);

impl CandidateList {
    /// Wrap a list of domains, rejecting an empty one
    pub fn new(domains: Vec<String>) -> FailoverResult<Self> {
        if domains.is_empty() {
            return Err(FailoverError::MalformedConfig("candidate list is empty".into()));
        }
        Ok(Self(domains))
    }

    /// Parse a configuration document: a non-empty JSON array of strings.
    ///
    /// Bytes that are not JSON fail with `InvalidJson`; JSON of the wrong
    /// shape fails with `MalformedConfig`.
    pub fn parse(document: &[u8]) -> FailoverResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(document)?;
        Self::from_value(&value)
    }

    /// Validate an already-decoded document
    pub fn from_value(value: &serde_json::Value) -> FailoverResult<Self> {
        let entries = value
            .as_array()
            .ok_or_else(|| FailoverError::MalformedConfig("expected a JSON array".into()))?;

        let domains = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry.as_str().map(str::to_string).ok_or_else(|| {
                    FailoverError::MalformedConfig(format!("entry {} is not a string", i))
                })
            })
            .collect::<FailoverResult<Vec<_>>>()?;

        Self::new(domains)
    }

    /// Domains in document order
    pub fn domains(&self) -> &[String] {
        &self.0
    }

    /// Iterate domains in document order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of entries, duplicates included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a candidate list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Just retrieved from the network
    Fresh,
    /// Read back from the durable cache
    Cached,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Fresh => "fresh",
            Provenance::Cached => "cached",
        }
    }
}

/// A candidate list tagged with its provenance. Built per request, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub candidates: CandidateList,
    pub provenance: Provenance,
}

impl ConfigSnapshot {
    pub fn fresh(candidates: CandidateList) -> Self {
        Self {
            candidates,
            provenance: Provenance::Fresh,
        }
    }

    pub fn cached(candidates: CandidateList) -> Self {
        Self {
            candidates,
            provenance: Provenance::Cached,
        }
    }

    pub fn is_cached(&self) -> bool {
        self.provenance == Provenance::Cached
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Reachable,
    Unreachable,
}

impl ProbeResult {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeResult::Reachable)
    }
}

impl From<bool> for ProbeResult {
    fn from(reachable: bool) -> Self {
        if reachable {
            ProbeResult::Reachable
        } else {
            ProbeResult::Unreachable
        }
    }
}

/// Result of one selection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Found(String),
    NotFound,
}

impl SelectionOutcome {
    /// The selected domain, if any
    pub fn domain(&self) -> Option<&str> {
        match self {
            SelectionOutcome::Found(domain) => Some(domain),
            SelectionOutcome::NotFound => None,
        }
    }

    /// The domain a client on `current` has to move to, if it has to move
    pub fn redirect_target(&self, current: &str) -> Option<&str> {
        self.domain().filter(|domain| *domain != current)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionOutcome::Found(_) => "found",
            SelectionOutcome::NotFound => "not_found",
        }
    }
}
