//! Request dispatch: cache front, network fallback
//!
//! Every REST call goes through `RequestDispatcher::fetch`. A live cache entry
//! short-circuits the network; otherwise the transport is called and a 2xx body
//! is written back to the cache. Cache faults are logged and suppressed, network
//! faults are logged and returned unchanged. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::cache::ResponseStore;
use crate::error::CoinCapError;
use crate::request::RequestUrl;
use crate::transport::Transport;

/// Single entry point for fetching response bodies
///
/// Cheap to share behind an `Arc`; concurrent fetches are independent. Two
/// concurrent misses on the same key both reach the network and both write the
/// cache.
pub struct RequestDispatcher {
    base_url: Url,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn ResponseStore>,
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("base_url", &self.base_url.as_str())
            .field("cache_enabled", &self.cache.is_enabled())
            .finish_non_exhaustive()
    }
}

impl RequestDispatcher {
    /// Creates a dispatcher over a transport and a response store
    pub fn new(base_url: Url, transport: Arc<dyn Transport>, cache: Arc<dyn ResponseStore>) -> Self {
        Self {
            base_url,
            transport,
            cache,
        }
    }

    /// Starts a resolved URL under this dispatcher's base URL
    pub fn url(&self, segments: &[&str]) -> RequestUrl {
        RequestUrl::new(&self.base_url, segments)
    }

    /// The response store in front of the transport
    pub fn cache(&self) -> &Arc<dyn ResponseStore> {
        &self.cache
    }

    /// Fetches a response body, using the cache when possible
    ///
    /// # Arguments
    /// * `url` - Fully-resolved request URL; its string form is the cache key
    /// * `ttl_secs` - Requested cache lifetime, raised to the store's minimum if shorter
    ///
    /// # Returns
    /// * `Ok(String)` - The response body, from cache or network
    /// * `Err(CoinCapError::Transport)` - The transport failed or reported a structured HTTP error
    /// * `Err(CoinCapError::UnknownResponse)` - Non-success status with no structured error
    pub async fn fetch(&self, url: &RequestUrl, ttl_secs: u64) -> Result<String, CoinCapError> {
        self.fetch_str(url.as_str(), ttl_secs).await
    }

    /// Same as [`fetch`](Self::fetch) for an already-rendered URL string
    pub async fn fetch_str(&self, url: &str, ttl_secs: u64) -> Result<String, CoinCapError> {
        if let Some(body) = self.lookup(url) {
            return Ok(body);
        }

        let response = match self.transport.get(url).await {
            Ok(response) => response,
            Err(e) => {
                error!(url, error = %e, "request failed");
                return Err(e.into());
            }
        };

        if response.is_success() {
            self.store(url, &response.body, ttl_secs);
            return Ok(response.body);
        }

        let status = response.status;
        match response.error {
            Some(e) => {
                error!(url, status, error = %e, "request returned an error response");
                Err(e.into())
            }
            None => {
                error!(url, status, "request failed with an unrecognised response");
                Err(CoinCapError::UnknownResponse { status })
            }
        }
    }

    /// Fetches and decodes a JSON response body
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &RequestUrl,
        ttl_secs: u64,
    ) -> Result<T, CoinCapError> {
        let body = self.fetch(url, ttl_secs).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Cache read; any store fault counts as a miss
    fn lookup(&self, url: &str) -> Option<String> {
        if !self.cache.is_enabled() {
            return None;
        }
        match self.cache.try_get(url) {
            Ok(Some(body)) => {
                trace!(url, "cache hit");
                Some(body)
            }
            Ok(None) => {
                debug!(url, "cache miss");
                None
            }
            Err(e) => {
                warn!(url, error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Cache write; any store fault is logged and ignored
    fn store(&self, url: &str, body: &str, ttl_secs: u64) {
        if !self.cache.is_enabled() {
            return;
        }
        if let Err(e) = self.cache.put(url, body, Duration::from_secs(ttl_secs)) {
            warn!(url, error = %e, "cache write failed, response not cached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::CacheError;
    use crate::request::parse_base_url;
    use crate::transport::{TransportError, TransportResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BODY: &str = r#"{"data":{"id":"bitcoin"}}"#;

    /// Transport that answers every call with the same canned outcome
    struct StubTransport {
        calls: AtomicUsize,
        reply: fn() -> Result<TransportResponse, TransportError>,
    }

    impl StubTransport {
        fn new(reply: fn() -> Result<TransportResponse, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, _url: &str) -> Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    /// Store whose every read and write fails
    struct BrokenStore;

    impl ResponseStore for BrokenStore {
        fn is_enabled(&self) -> bool {
            true
        }
        fn set_enabled(&self, _enabled: bool) {}
        fn try_get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("backing map unreachable".to_string()))
        }
        fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("backing map unreachable".to_string()))
        }
        fn clear(&self) {}
    }

    fn ok_body() -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse::ok(BODY))
    }

    fn dispatcher(transport: Arc<StubTransport>, cache: Arc<dyn ResponseStore>) -> RequestDispatcher {
        let base = parse_base_url("https://api.coincap.io").unwrap();
        RequestDispatcher::new(base, transport, cache)
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let transport = StubTransport::new(ok_body);
        let cache = Arc::new(MemoryCache::new());
        let dispatcher = dispatcher(transport.clone(), cache.clone());
        let url = dispatcher.url(&["assets", "bitcoin"]);

        assert_eq!(dispatcher.fetch(&url, 60).await.unwrap(), BODY);
        assert_eq!(dispatcher.fetch(&url, 60).await.unwrap(), BODY);

        assert_eq!(transport.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_hits_network() {
        let transport = StubTransport::new(ok_body);
        let cache = Arc::new(MemoryCache::new());
        cache.set_enabled(false);
        let dispatcher = dispatcher(transport.clone(), cache.clone());
        let url = dispatcher.url(&["rates"]);

        dispatcher.fetch(&url, 15).await.unwrap();
        dispatcher.fetch(&url, 15).await.unwrap();

        assert_eq!(transport.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_broken_cache_never_blocks_successful_fetch() {
        let transport = StubTransport::new(ok_body);
        let dispatcher = dispatcher(transport.clone(), Arc::new(BrokenStore));
        let url = dispatcher.url(&["assets", "bitcoin"]);

        assert_eq!(dispatcher.fetch(&url, 60).await.unwrap(), BODY);
        assert_eq!(dispatcher.fetch(&url, 60).await.unwrap(), BODY);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_disposed_cache_degrades_to_network() {
        let transport = StubTransport::new(ok_body);
        let cache = Arc::new(MemoryCache::new());
        let dispatcher = dispatcher(transport.clone(), cache.clone());
        let url = dispatcher.url(&["exchanges"]);

        dispatcher.fetch(&url, 120).await.unwrap();
        cache.dispose();

        assert_eq!(dispatcher.fetch(&url, 120).await.unwrap(), BODY);
        assert_eq!(transport.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_structured_error_is_propagated_and_not_cached() {
        let transport = StubTransport::new(|| {
            Ok(TransportResponse {
                status: 404,
                body: r#"{"error":"bitcoins not found"}"#.to_string(),
                error: Some(TransportError::Status {
                    status: 404,
                    message: "bitcoins not found".to_string(),
                }),
            })
        });
        let cache = Arc::new(MemoryCache::new());
        let dispatcher = dispatcher(transport, cache.clone());
        let url = dispatcher.url(&["assets", "bitcoins"]);

        let err = dispatcher.fetch(&url, 60).await.unwrap_err();
        assert!(matches!(
            err,
            CoinCapError::Transport(TransportError::Status { status: 404, .. })
        ));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_json_decodes_body() {
        #[derive(serde::Deserialize)]
        struct Envelope {
            data: serde_json::Value,
        }

        let transport = StubTransport::new(ok_body);
        let dispatcher = dispatcher(transport, Arc::new(MemoryCache::new()));
        let url = dispatcher.url(&["assets", "bitcoin"]);

        let envelope: Envelope = dispatcher.fetch_json(&url, 60).await.unwrap();
        assert_eq!(envelope.data["id"], "bitcoin");
    }

    #[tokio::test]
    async fn test_fetch_json_reports_malformed_body() {
        let transport = StubTransport::new(|| Ok(TransportResponse::ok("not json")));
        let dispatcher = dispatcher(transport, Arc::new(MemoryCache::new()));
        let url = dispatcher.url(&["rates"]);

        let result: Result<serde_json::Value, _> = dispatcher.fetch_json(&url, 15).await;
        assert!(matches!(result, Err(CoinCapError::Deserialize(_))));
    }
}
