//! Resolved request URLs
//!
//! A resolved URL is `{base}/v{API_VERSION}/{segment}/...[?query]`. Query
//! parameters keep the order they were added in and the resulting string is used
//! verbatim as the cache key, so `?a=1&b=2` and `?b=2&a=1` are different keys.

use std::fmt;

use url::Url;

use crate::error::CoinCapError;
use crate::API_VERSION;

/// Parses and checks a base URL
///
/// Rejects strings that are not absolute URLs able to carry path segments.
pub fn parse_base_url(base_url: &str) -> Result<Url, CoinCapError> {
    let url = Url::parse(base_url.trim())
        .map_err(|e| CoinCapError::invalid("base_url", format!("not a valid URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(CoinCapError::invalid("base_url", "URL cannot carry a path"));
    }
    Ok(url)
}

/// Builder for a fully-resolved request URL
#[derive(Debug, Clone)]
pub struct RequestUrl {
    url: Url,
}

impl RequestUrl {
    /// Starts a URL at `{base}/v{API_VERSION}/{segments...}`
    ///
    /// `base` must come from [`parse_base_url`], which guarantees it can carry
    /// path segments.
    pub(crate) fn new(base: &Url, segments: &[&str]) -> Self {
        debug_assert!(!base.cannot_be_a_base(), "base URL cannot carry a path: {base}");
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(&format!("v{}", API_VERSION));
            for segment in segments {
                path.push(segment);
            }
        }
        Self { url }
    }

    /// Appends a query parameter
    pub fn query(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.url
            .query_pairs_mut()
            .append_pair(name, &value.to_string());
        self
    }

    /// Appends a query parameter only when a value is present
    pub fn query_opt(self, name: &str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// The resolved URL, which is also the cache key
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
