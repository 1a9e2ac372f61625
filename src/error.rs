//! Error types for the CoinCap client
//!
//! `CoinCapError` is what endpoint callers see. `CacheError` only travels between
//! the response store and the dispatcher, which logs it and carries on as if the
//! cache had missed.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced to callers of the client
#[derive(Debug, Error)]
pub enum CoinCapError {
    /// Caller-side validation failed before any cache or network activity
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The transport could not complete the request or reported a structured HTTP error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-success HTTP status with no structured error attached
    #[error("Unknown failure, HTTP status {status} is not success")]
    UnknownResponse {
        /// Raw HTTP status code
        status: u16,
    },

    /// Response body could not be decoded into the expected type
    #[error("Failed to parse JSON response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl CoinCapError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnknownResponse { status } => Some(*status),
            Self::Transport(TransportError::Status { status, .. }) => Some(*status),
            Self::Transport(TransportError::Http(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Faults inside a response store
///
/// These never reach endpoint callers.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store was disposed while the operation was pending
    #[error("Cache has been disposed")]
    Disposed,

    /// The store could not serve the request
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message_names_parameter() {
        let err = CoinCapError::invalid("id", "must be a valid asset id");
        let msg = err.to_string();
        assert!(msg.contains("`id`"));
        assert!(msg.contains("must be a valid asset id"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_unknown_response_carries_status() {
        let err = CoinCapError::UnknownResponse { status: 429 };
        assert_eq!(err.status(), Some(429));
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_structured_status_error_exposes_status() {
        let err = CoinCapError::from(TransportError::Status {
            status: 404,
            message: "asset not found".to_string(),
        });
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("asset not found"));
    }

    #[test]
    fn test_deserialize_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CoinCapError = parse_err.into();
        assert!(matches!(err, CoinCapError::Deserialize(_)));
    }
}
