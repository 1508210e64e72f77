//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use domain_switcher::blob_store::BlobStore;
use domain_switcher::failover::{
    ConfigStore, FailoverEngine, FailoverSelector, ProbeResult, Prober, SessionHub,
};
use domain_switcher::net::{FetchError, FetchRequest, FetchResponse, FetchResult, HttpClient};
use domain_switcher::observability::MetricsRegistry;

pub const CONFIG_URL: &str = "https://primary.example.com/domains.json";

/// What the configuration endpoint answers
#[derive(Debug, Clone)]
pub enum Upstream {
    Serve(u16, String),
    Fail(FetchError),
    Hang,
}

impl Upstream {
    pub fn list(domains: &[&str]) -> Self {
        Upstream::Serve(200, serde_json::to_string(domains).unwrap())
    }
}

/// Configuration endpoint whose answer can be changed between calls
#[derive(Debug)]
pub struct ScriptedClient {
    upstream: Mutex<Upstream>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedClient {
    pub fn new(upstream: Upstream) -> Arc<Self> {
        Arc::new(Self {
            upstream: Mutex::new(upstream),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn set(&self, upstream: Upstream) {
        *self.upstream.lock().unwrap() = upstream;
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn fetch(&self, request: FetchRequest) -> FetchResult<FetchResponse> {
        self.requests.lock().unwrap().push(request);
        let upstream = self.upstream.lock().unwrap().clone();
        match upstream {
            Upstream::Serve(status, body) => Ok(FetchResponse::new(status, body)),
            Upstream::Fail(e) => Err(e),
            Upstream::Hang => std::future::pending().await,
        }
    }
}

/// Prober with a fixed set of reachable domains
#[derive(Debug, Default)]
pub struct ScriptedProber {
    reachable: HashSet<String>,
    delay: Option<Duration>,
    probed: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn reaching(domains: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            reachable: domains.iter().map(|d| d.to_string()).collect(),
            delay: None,
            probed: Mutex::new(Vec::new()),
        })
    }

    /// Every probe suspends for `delay` before answering
    pub fn slow(domains: &[&str], delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reachable: domains.iter().map(|d| d.to_string()).collect(),
            delay: Some(delay),
            probed: Mutex::new(Vec::new()),
        })
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, domain: &str) -> ProbeResult {
        self.probed.lock().unwrap().push(domain.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reachable.contains(domain).into()
    }
}

/// Everything a test may want to poke at
pub struct Harness {
    pub engine: Arc<FailoverEngine>,
    pub client: Arc<ScriptedClient>,
    pub prober: Arc<ScriptedProber>,
    pub metrics: Arc<MetricsRegistry>,
}

pub fn harness(
    upstream: Upstream,
    store: Arc<dyn BlobStore>,
    prober: Arc<ScriptedProber>,
) -> Harness {
    let metrics = Arc::new(MetricsRegistry::new());
    let client = ScriptedClient::new(upstream);

    let config_store = Arc::new(ConfigStore::new(
        client.clone(),
        store,
        CONFIG_URL,
        metrics.clone(),
    ));
    let selector = FailoverSelector::new(config_store, prober.clone(), metrics.clone());
    let engine = FailoverEngine::new(selector, Arc::new(SessionHub::new()), metrics.clone());

    Harness {
        engine: Arc::new(engine),
        client,
        prober,
        metrics,
    }
}
