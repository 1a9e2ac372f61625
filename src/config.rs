//! Client configuration
//!
//! `ClientConfig` is built in code: start from `Default` and adjust with the
//! `with_*` methods.

use std::time::Duration;

use crate::API_BASE_URL;

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for a `CoinCapClient`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service, without the version segment
    pub base_url: String,
    /// Optional API key sent as a bearer token
    pub api_key: Option<String>,
    /// Per-request transport timeout
    pub timeout: Duration,
    /// Client identification string sent as `User-Agent`
    pub user_agent: String,
    /// Whether the response cache starts enabled
    pub cache_enabled: bool,
    /// Interval of the background sweep of expired cache entries, if any
    pub sweep_interval: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("coincap-rs/{}", env!("CARGO_PKG_VERSION")),
            cache_enabled: true,
            sweep_interval: None,
        }
    }
}

impl ClientConfig {
    /// Points the client at a different base URL (for testing or proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the `User-Agent` string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets whether the response cache starts enabled
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Enables the periodic sweep of expired cache entries
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// The API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.coincap.io");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("coincap-rs/"));
        assert!(config.cache_enabled);
        assert!(config.sweep_interval.is_none());
    }

    #[test]
    fn test_client_config_builders() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8080")
            .with_api_key("abc123")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("tests/1.0")
            .with_cache_enabled(false)
            .with_sweep_interval(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests/1.0");
        assert!(!config.cache_enabled);
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        assert_eq!(ClientConfig::default().with_api_key("").api_key(), None);
        assert_eq!(ClientConfig::default().with_api_key("   ").api_key(), None);
    }
}
