//! HTTP transport used by the dispatcher
//!
//! The dispatcher only needs one capability: GET a resolved URL and report the
//! status, the body and, for failed requests, any structured error the service
//! returned. `HttpTransport` provides that on top of reqwest with the fixed
//! per-client headers; tests substitute their own `Transport`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONNECTION, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::error::CoinCapError;

/// Errors produced by a transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status and an error payload
    #[error("HTTP {status}: {message}")]
    Status {
        /// Raw HTTP status code
        status: u16,
        /// Message from the service's error payload
        message: String,
    },

    /// I/O failure reported by a custom transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a completed GET
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
    /// Structured error for non-success responses, when the transport recognised one
    pub error: Option<TransportError>,
}

impl TransportResponse {
    /// A 2xx response carrying `body`
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            error: None,
        }
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs network GETs for the dispatcher
///
/// Implementations do not retry and do not cache; they relay the outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET for a fully-resolved URL
    ///
    /// # Returns
    /// * `Ok(TransportResponse)` when the server answered, whatever the status
    /// * `Err(TransportError)` when the request could not complete
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

/// Error payload the service returns alongside non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
}

/// reqwest-backed transport with the client's fixed headers
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the underlying reqwest client from the given configuration
    ///
    /// Sets `Accept`, `Connection: keep-alive`, `User-Agent` and, when an API key
    /// is configured, `Authorization: Bearer <key>`. Content-encoding negotiation
    /// is handled by reqwest's gzip/deflate/brotli support.
    ///
    /// # Errors
    /// `CoinCapError::InvalidArgument` if the user agent or API key cannot be
    /// sent as a header value, before any connection is attempted.
    pub fn new(config: &ClientConfig) -> Result<Self, CoinCapError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| CoinCapError::invalid("user_agent", "not a valid header value"))?;
        headers.insert(USER_AGENT, agent);

        if let Some(key) = config.api_key() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| CoinCapError::invalid("api_key", "not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { client })
    }

    /// Wraps an existing reqwest client as-is
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let error = if (200..300).contains(&status) {
            None
        } else {
            structured_error(status, &body)
        };

        Ok(TransportResponse {
            status,
            body,
            error,
        })
    }
}

/// Recognises the service's `{"error": "..."}` payload on a failed response
fn structured_error(status: u16, body: &str) -> Option<TransportError> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    Some(TransportError::Status {
        status,
        message: payload.error,
    })
}
