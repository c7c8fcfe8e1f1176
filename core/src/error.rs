//! Error types for the request client.
//!
//! # Design
//! Failures split into two families. Transport failures (`TransportError`)
//! come from the network layer and never carry a response. Everything else is
//! raised by the client pipeline itself: a non-2xx status, an envelope whose
//! code signals failure, or a body that does not match the expected payload.
//! Session-expiry codes get their own variant because callers typically
//! react to them by dropping the cached credential.

use thiserror::Error;

/// Failures raised by a `Transport` implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The exchange did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established or broke mid-exchange.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response arrived in full but its body is not valid UTF-8.
    /// The client reports this as `ClientError::Deserialization`.
    #[error("undecodable response body: {0}")]
    Decode(String),

    #[error("transport error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Errors returned by `RequestClient` calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request URL could not be resolved against the base URL.
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Transport(TransportError),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response envelope carried a failure code.
    #[error("request failed with code {code}: {message}")]
    Api { code: i64, message: String },

    /// The response envelope carried one of the session-expiry codes.
    #[error("session expired (code {code}): {message}")]
    SessionExpired { code: i64, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Raised by a caller-supplied hook.
    #[error("hook failed: {0}")]
    Hook(String),
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Decode(reason) => ClientError::Deserialization(reason),
            other => ClientError::Transport(other),
        }
    }
}

impl ClientError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(TransportError::Timeout))
    }

    /// The envelope code, for `Api` and `SessionExpired`.
    pub fn code(&self) -> Option<i64> {
        match self {
            ClientError::Api { code, .. } | ClientError::SessionExpired { code, .. } => Some(*code),
            _ => None,
        }
    }
}
