//! # Config Store
//!
//! Two-tier access to the candidate list: a fresh copy from the network,
//! else the last copy persisted in the durable cache.
//!
//! The only cache write is in [`ConfigStore::fetch_fresh`], after a fresh
//! document has parsed. Writes replace the whole entry.
//!
//! A fresh response that is JSON of the wrong shape ends the lookup: the
//! cache is only consulted when the network failed, the status was not a
//! success, or the body was not JSON.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::errors::{FailoverError, FailoverResult};
use super::types::{CandidateList, ConfigSnapshot};
use crate::blob_store::BlobStore;
use crate::net::{FetchRequest, HttpClient};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

/// Default bound on the configuration document fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Pick the answering tier.
///
/// The fresh list wins whenever there is one; the cached list is only
/// used without it. No list from either tier is `ConfigUnavailable`.
pub fn choose_snapshot(
    fresh: Option<CandidateList>,
    cached: Option<CandidateList>,
) -> FailoverResult<ConfigSnapshot> {
    match (fresh, cached) {
        (Some(list), _) => Ok(ConfigSnapshot::fresh(list)),
        (None, Some(list)) => Ok(ConfigSnapshot::cached(list)),
        (None, None) => Err(FailoverError::ConfigUnavailable),
    }
}

/// Two-tier candidate list accessor
#[derive(Debug)]
pub struct ConfigStore {
    client: Arc<dyn HttpClient>,
    store: Arc<dyn BlobStore>,
    config_url: String,
    fetch_timeout: Duration,
    metrics: Arc<MetricsRegistry>,
}

impl ConfigStore {
    /// `config_url` is both the document location and the cache key
    pub fn new(
        client: Arc<dyn HttpClient>,
        store: Arc<dyn BlobStore>,
        config_url: impl Into<String>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            client,
            store,
            config_url: config_url.into(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            metrics,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Canonical document URL (the cache key)
    pub fn config_url(&self) -> &str {
        &self.config_url
    }

    /// Document URL with a per-request token so no cache can answer it
    pub fn cache_busting_url(&self) -> String {
        let separator = if self.config_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}v={}",
            self.config_url,
            separator,
            Utc::now().timestamp_millis()
        )
    }

    /// Fetch the document from the network and persist it if usable.
    ///
    /// A failed cache write is logged and does not discard the fresh list.
    pub async fn fetch_fresh(&self) -> FailoverResult<CandidateList> {
        let request = FetchRequest::get(self.cache_busting_url())
            .no_cache()
            .with_timeout(self.fetch_timeout);

        let response = tokio::time::timeout(self.fetch_timeout, self.client.fetch(request))
            .await
            .map_err(|_| FailoverError::FetchFailed("Request timed out".into()))??;

        if !response.is_success() {
            return Err(FailoverError::BadStatus(response.status));
        }

        let list = CandidateList::parse(&response.body)?;

        if let Err(e) = self.store.put(&self.config_url, &response.body).await {
            log_event_with_fields(
                Event::ConfigPersistFailed,
                &[("key", &self.config_url), ("reason", &e.to_string())],
            );
        }

        Ok(list)
    }

    /// Read the persisted list, surfacing storage and parse errors
    pub async fn cached(&self) -> FailoverResult<Option<CandidateList>> {
        match self.store.get(&self.config_url).await? {
            Some(bytes) => CandidateList::parse(&bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn load_cached(&self) -> Option<CandidateList> {
        match self.cached().await {
            Ok(list) => list,
            Err(e) => {
                log_event_with_fields(
                    Event::ConfigFetchFailed,
                    &[("source", "cache"), ("code", e.code()), ("reason", &e.to_string())],
                );
                None
            }
        }
    }

    /// Fresh list if the network delivers a usable one, else the cached
    /// list, else `ConfigUnavailable`.
    ///
    /// A well-formed JSON response that is not a usable list is
    /// `ConfigUnavailable` without reading the cache.
    pub async fn get_fresh_or_cached(&self) -> FailoverResult<ConfigSnapshot> {
        let snapshot = match self.fetch_fresh().await {
            Ok(list) => choose_snapshot(Some(list), None),
            Err(e) => {
                log_event_with_fields(
                    Event::ConfigFetchFailed,
                    &[("source", "network"), ("code", e.code()), ("reason", &e.to_string())],
                );
                if matches!(e, FailoverError::MalformedConfig(_)) {
                    Err(FailoverError::ConfigUnavailable)
                } else {
                    choose_snapshot(None, self.load_cached().await)
                }
            }
        };

        match &snapshot {
            Ok(snapshot) if snapshot.is_cached() => {
                self.metrics.increment_config_cached();
                let count = snapshot.candidates.len().to_string();
                log_event_with_fields(Event::ConfigFallbackCached, &[("candidates", &count)]);
            }
            Ok(snapshot) => {
                self.metrics.increment_config_fresh();
                let count = snapshot.candidates.len().to_string();
                log_event_with_fields(Event::ConfigFetchFresh, &[("candidates", &count)]);
            }
            Err(_) => {
                self.metrics.increment_config_unavailable();
                log_event_with_fields(Event::ConfigUnavailable, &[("url", &self.config_url)]);
            }
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_store::{BlobError, BlobResult, MemoryBlobStore};
    use crate::failover::types::Provenance;
    use crate::net::{FetchError, FetchResponse, FetchResult};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const URL: &str = "https://primary.example.com/domains.json";

    #[derive(Debug)]
    enum Reply {
        Ok(u16, &'static str),
        Err(FetchError),
        Hang,
    }

    #[derive(Debug, Default)]
    struct ScriptedClient {
        replies: Mutex<VecDeque<Reply>>,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn with(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                urls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedClient {
        async fn fetch(&self, request: FetchRequest) -> FetchResult<FetchResponse> {
            self.urls.lock().unwrap().push(request.url);
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(Reply::Ok(status, body)) => Ok(FetchResponse::new(status, body)),
                Some(Reply::Err(e)) => Err(e),
                Some(Reply::Hang) => std::future::pending().await,
                None => Err(FetchError::Connect("no scripted reply".into())),
            }
        }
    }

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl BlobStore for BrokenStore {
        async fn get(&self, _key: &str) -> BlobResult<Option<Vec<u8>>> {
            Err(BlobError::Io("disk gone".into()))
        }

        async fn put(&self, _key: &str, _data: &[u8]) -> BlobResult<()> {
            Err(BlobError::Io("disk gone".into()))
        }
    }

    fn config_store(client: Arc<ScriptedClient>, store: Arc<dyn BlobStore>) -> ConfigStore {
        ConfigStore::new(client, store, URL, Arc::new(MetricsRegistry::new()))
    }

    fn list(domains: &[&str]) -> CandidateList {
        CandidateList::new(domains.iter().map(|d| d.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_choose_snapshot() {
        let fresh = list(&["a.example.com"]);
        let cached = list(&["b.example.com"]);

        let snapshot = choose_snapshot(Some(fresh.clone()), Some(cached.clone())).unwrap();
        assert_eq!(snapshot.provenance, Provenance::Fresh);
        assert_eq!(snapshot.candidates, fresh);

        let snapshot = choose_snapshot(None, Some(cached.clone())).unwrap();
        assert_eq!(snapshot.provenance, Provenance::Cached);
        assert_eq!(snapshot.candidates, cached);

        assert_eq!(choose_snapshot(None, None), Err(FailoverError::ConfigUnavailable));
    }

    #[test]
    fn test_cache_busting_url() {
        let store = config_store(ScriptedClient::with(vec![]), Arc::new(MemoryBlobStore::new()));
        let url = store.cache_busting_url();
        assert!(url.starts_with("https://primary.example.com/domains.json?v="));

        let store = ConfigStore::new(
            ScriptedClient::with(vec![]),
            Arc::new(MemoryBlobStore::new()),
            "https://primary.example.com/domains.json?site=1",
            Arc::new(MetricsRegistry::new()),
        );
        assert!(store.cache_busting_url().contains("?site=1&v="));
    }

    #[tokio::test]
    async fn test_fresh_is_persisted_under_canonical_key() {
        let client = ScriptedClient::with(vec![Reply::Ok(200, r#"["b1.example.com","b2.example.com"]"#)]);
        let blobs = Arc::new(MemoryBlobStore::new());
        let store = config_store(client.clone(), blobs.clone());

        let snapshot = store.get_fresh_or_cached().await.unwrap();
        assert_eq!(snapshot.provenance, Provenance::Fresh);
        assert_eq!(snapshot.candidates, list(&["b1.example.com", "b2.example.com"]));

        let persisted = blobs.get(URL).await.unwrap().unwrap();
        assert_eq!(persisted, br#"["b1.example.com","b2.example.com"]"#.to_vec());

        let urls = client.urls.lock().unwrap();
        assert_ne!(urls[0], URL);
        assert!(urls[0].starts_with(URL));
    }

    #[tokio::test]
    async fn test_network_error_falls_back_to_cache() {
        let blobs = Arc::new(MemoryBlobStore::new());
        blobs.put(URL, br#"["cached.example.com"]"#).await.unwrap();

        let store = config_store(
            ScriptedClient::with(vec![Reply::Err(FetchError::Connect("refused".into()))]),
            blobs,
        );

        let snapshot = store.get_fresh_or_cached().await.unwrap();
        assert_eq!(snapshot.provenance, Provenance::Cached);
        assert_eq!(snapshot.candidates, list(&["cached.example.com"]));
    }

    #[tokio::test]
    async fn test_bad_status_falls_back_to_cache() {
        let blobs = Arc::new(MemoryBlobStore::new());
        blobs.put(URL, br#"["cached.example.com"]"#).await.unwrap();

        let store = config_store(ScriptedClient::with(vec![Reply::Ok(404, "not found")]), blobs);

        let snapshot = store.get_fresh_or_cached().await.unwrap();
        assert!(snapshot.is_cached());
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back_to_cache() {
        for body in ["[\"broken\"", "<html>maintenance</html>", ""] {
            let blobs = Arc::new(MemoryBlobStore::new());
            blobs.put(URL, br#"["cached.example.com"]"#).await.unwrap();

            let store = config_store(ScriptedClient::with(vec![Reply::Ok(200, body)]), blobs.clone());

            let snapshot = store.get_fresh_or_cached().await.unwrap();
            assert!(snapshot.is_cached(), "body {:?} should fall back", body);
            assert_eq!(
                blobs.get(URL).await.unwrap().unwrap(),
                br#"["cached.example.com"]"#.to_vec()
            );
        }
    }

    #[tokio::test]
    async fn test_wrong_shape_fresh_document_is_unavailable() {
        for body in ["[]", "{\"a\":1}", "{}", "[\"a.example.com\", 7]", "null"] {
            let metrics = Arc::new(MetricsRegistry::new());
            let blobs = Arc::new(MemoryBlobStore::new());
            blobs.put(URL, br#"["cached.example.com"]"#).await.unwrap();

            let store = ConfigStore::new(
                ScriptedClient::with(vec![Reply::Ok(200, body)]),
                blobs.clone(),
                URL,
                metrics.clone(),
            );

            assert_eq!(
                store.get_fresh_or_cached().await,
                Err(FailoverError::ConfigUnavailable),
                "body {:?} should end the lookup",
                body
            );
            // Not persisted either
            assert_eq!(
                blobs.get(URL).await.unwrap().unwrap(),
                br#"["cached.example.com"]"#.to_vec()
            );
            assert_eq!(metrics.snapshot().config_cached, 0);
            assert_eq!(metrics.snapshot().config_unavailable, 1);
        }
    }

    #[tokio::test]
    async fn test_nothing_usable_is_unavailable() {
        let store = config_store(
            ScriptedClient::with(vec![Reply::Err(FetchError::Timeout)]),
            Arc::new(MemoryBlobStore::new()),
        );
        assert_eq!(store.get_fresh_or_cached().await, Err(FailoverError::ConfigUnavailable));
    }

    #[tokio::test]
    async fn test_malformed_cache_is_unavailable() {
        let blobs = Arc::new(MemoryBlobStore::new());
        blobs.put(URL, b"[]").await.unwrap();

        let store = config_store(ScriptedClient::with(vec![Reply::Ok(500, "")]), blobs);
        assert_eq!(store.get_fresh_or_cached().await, Err(FailoverError::ConfigUnavailable));
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_fresh_list() {
        let store = config_store(
            ScriptedClient::with(vec![Reply::Ok(200, r#"["a.example.com"]"#)]),
            Arc::new(BrokenStore),
        );

        let snapshot = store.get_fresh_or_cached().await.unwrap();
        assert_eq!(snapshot.provenance, Provenance::Fresh);
    }

    #[tokio::test]
    async fn test_cache_read_failure_is_unavailable() {
        let store = config_store(
            ScriptedClient::with(vec![Reply::Err(FetchError::Timeout)]),
            Arc::new(BrokenStore),
        );

        assert_eq!(store.get_fresh_or_cached().await, Err(FailoverError::ConfigUnavailable));
        assert!(matches!(store.cached().await, Err(FailoverError::Storage(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_fetch_is_bounded() {
        let blobs = Arc::new(MemoryBlobStore::new());
        blobs.put(URL, br#"["cached.example.com"]"#).await.unwrap();

        let store = config_store(ScriptedClient::with(vec![Reply::Hang]), blobs)
            .with_fetch_timeout(Duration::from_millis(500));

        let snapshot = store.get_fresh_or_cached().await.unwrap();
        assert!(snapshot.is_cached());
    }

    #[tokio::test]
    async fn test_metrics_follow_provenance() {
        let metrics = Arc::new(MetricsRegistry::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let client = ScriptedClient::with(vec![
            Reply::Ok(200, r#"["a.example.com"]"#),
            Reply::Err(FetchError::Timeout),
        ]);
        let store = ConfigStore::new(client, blobs, URL, metrics.clone());

        store.get_fresh_or_cached().await.unwrap();
        store.get_fresh_or_cached().await.unwrap();
        let _ = store.get_fresh_or_cached().await;

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.config_fresh, 1);
        // Third call has no scripted reply, but the cache now holds the fresh copy
        assert_eq!(snapshot.config_cached, 2);
        assert_eq!(snapshot.config_unavailable, 0);
    }
}
