//! Error types for the NinjaOne API client.
//!
//! # Design
//! Each variant maps to one failure boundary: the token endpoint (`Auth`),
//! the local token precondition (`MissingToken`), the network (`Transport`),
//! the remote status line (`HttpStatus`), the response body (`Decode`) and
//! the projection helpers (`NotFound`). Callers branch on the variant; no
//! operation reports failure through a sentinel value.

use std::error::Error as StdError;

/// Errors returned by `NinjaClient` operations and the projection helpers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The token endpoint rejected the credentials or answered without an
    /// `access_token`.
    #[error("authentication failed: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// An authenticated call was attempted before a token was obtained.
    #[error("no access token; call authenticate() first")]
    MissingToken,

    /// The request never produced an HTTP response (DNS, TCP, TLS, timeout).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body is not the JSON the operation expected.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No record matched the lookup.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The configured base URL plus path does not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client configuration could not be assembled.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub(crate) fn auth(message: impl Into<String>) -> Self {
        ApiError::Auth {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ApiError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn auth_error_displays_message() {
        let err = ApiError::auth("invalid client id or secret");
        assert_eq!(
            err.to_string(),
            "authentication failed: invalid client id or secret"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn http_status_error_keeps_status_and_body() {
        let err = ApiError::HttpStatus {
            status: 403,
            body: r#"{"error":"forbidden"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("forbidden"));
    }

    #[test]
    fn decode_error_chains_serde_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ApiError::from(json_err);
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn transport_error_chains_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = ApiError::transport("GET https://api.ninjarmm.com/v2/devices", io);
        assert!(err.to_string().starts_with("transport error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
