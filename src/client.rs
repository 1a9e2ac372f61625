//! The CoinCap client
//!
//! `CoinCapClient` owns one response cache and one dispatcher and hands out
//! the endpoint groups. Clones share the same cache; the cache is disposed when
//! `dispose` is called or the last clone is dropped.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{MemoryCache, ResponseStore};
use crate::config::ClientConfig;
use crate::data::{AssetsClient, CandlesClient, ExchangesClient, MarketsClient, RatesClient};
use crate::dispatch::RequestDispatcher;
use crate::error::CoinCapError;
use crate::request::parse_base_url;
use crate::transport::{HttpTransport, Transport};

struct Inner {
    dispatcher: RequestDispatcher,
    cache: Arc<MemoryCache>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cache.dispose();
    }
}

/// Typed access to the CoinCap REST API
///
/// Response caching is enabled by default; turn it off with
/// [`set_cache_enabled`](Self::set_cache_enabled).
#[derive(Clone)]
pub struct CoinCapClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CoinCapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinCapClient")
            .field("dispatcher", &self.inner.dispatcher)
            .field("cached_entries", &self.inner.cache.len())
            .finish()
    }
}

impl CoinCapClient {
    /// Creates a client talking HTTP with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, CoinCapError> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client on top of any transport
    ///
    /// The transport is responsible for its own headers; only the base URL and
    /// cache settings of `config` are used here. Starting the sweeper requires a
    /// running tokio runtime.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, CoinCapError> {
        let base_url = parse_base_url(&config.base_url)?;

        let cache = Arc::new(MemoryCache::new());
        cache.set_enabled(config.cache_enabled);
        if let Some(interval) = config.sweep_interval {
            cache.spawn_sweeper(interval);
        }

        let dispatcher = RequestDispatcher::new(base_url, transport, cache.clone());
        debug!(base_url = %config.base_url, cache_enabled = config.cache_enabled, "client created");

        Ok(Self {
            inner: Arc::new(Inner { dispatcher, cache }),
        })
    }

    /// The `/assets` endpoints
    pub fn assets(&self) -> AssetsClient<'_> {
        AssetsClient::new(&self.inner.dispatcher)
    }

    /// The `/rates` endpoints
    pub fn rates(&self) -> RatesClient<'_> {
        RatesClient::new(&self.inner.dispatcher)
    }

    /// The `/exchanges` endpoints
    pub fn exchanges(&self) -> ExchangesClient<'_> {
        ExchangesClient::new(&self.inner.dispatcher)
    }

    /// The `/markets` endpoint
    pub fn markets(&self) -> MarketsClient<'_> {
        MarketsClient::new(&self.inner.dispatcher)
    }

    /// The `/candles` endpoint
    pub fn candles(&self) -> CandlesClient<'_> {
        CandlesClient::new(&self.inner.dispatcher)
    }

    /// Whether responses are currently cached
    pub fn is_cache_enabled(&self) -> bool {
        self.inner.cache.is_enabled()
    }

    /// Turns response caching on or off; stored entries are kept either way
    pub fn set_cache_enabled(&self, enabled: bool) {
        self.inner.cache.set_enabled(enabled);
    }

    /// Drops every cached response
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// The response cache shared by all clones of this client
    pub fn cache(&self) -> &Arc<MemoryCache> {
        &self.inner.cache
    }

    /// The dispatcher behind every endpoint call
    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.inner.dispatcher
    }

    /// Releases the cache and its sweeper
    ///
    /// Idempotent. Requests issued afterwards still work, they just always go
    /// to the network.
    pub fn dispose(&self) {
        self.inner.cache.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{TransportError, TransportResponse};
    use async_trait::async_trait;

    struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
            Ok(TransportResponse::ok(format!(r#"{{"data":"{url}","timestamp":0}}"#)))
        }
    }

    fn client(config: ClientConfig) -> CoinCapClient {
        CoinCapClient::with_transport(config, Arc::new(EchoTransport)).unwrap()
    }

    #[test]
    fn test_cache_enabled_by_default() {
        let client = client(ClientConfig::default());
        assert!(client.is_cache_enabled());
    }

    #[test]
    fn test_config_can_start_with_cache_disabled() {
        let client = client(ClientConfig::default().with_cache_enabled(false));
        assert!(!client.is_cache_enabled());

        client.set_cache_enabled(true);
        assert!(client.is_cache_enabled());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = CoinCapClient::with_transport(
            ClientConfig::default().with_base_url("::not a url::"),
            Arc::new(EchoTransport),
        );
        assert!(matches!(
            result,
            Err(CoinCapError::InvalidArgument { name: "base_url", .. })
        ));
    }

    #[test]
    fn test_bad_header_values_are_rejected_before_any_request() {
        let result = CoinCapClient::new(ClientConfig::default().with_api_key("abc\ndef"));
        assert!(matches!(
            result,
            Err(CoinCapError::InvalidArgument { name: "api_key", .. })
        ));

        let result = CoinCapClient::new(ClientConfig::default().with_user_agent("bad\nagent"));
        assert!(matches!(
            result,
            Err(CoinCapError::InvalidArgument { name: "user_agent", .. })
        ));
    }

    #[tokio::test]
    async fn test_clones_share_cache() {
        let client = client(ClientConfig::default());
        let other = client.clone();

        let url = client.dispatcher().url(&["rates"]);
        client.dispatcher().fetch(&url, 15).await.unwrap();

        assert_eq!(other.cache().len(), 1);
        other.clear_cache();
        assert!(client.cache().is_empty());
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent_and_requests_still_work() {
        let client = client(ClientConfig::default().with_sweep_interval(std::time::Duration::from_secs(1)));
        client.dispose();
        client.dispose();
        assert!(client.cache().is_disposed());

        let url = client.dispatcher().url(&["exchanges"]);
        assert!(client.dispatcher().fetch(&url, 120).await.is_ok());
    }

    #[test]
    fn test_dropping_last_clone_disposes_cache() {
        let client = client(ClientConfig::default());
        let cache = Arc::clone(client.cache());
        let other = client.clone();

        drop(client);
        assert!(!cache.is_disposed());

        drop(other);
        assert!(cache.is_disposed());
    }
}
