//! Error types for the JSON request helpers.
//!
//! # Design
//! Every non-2xx response lands in a single `Status` variant carrying the raw
//! status code and body text. Transport and decoder failures are wrapped
//! without rewriting their messages so callers see the original cause.

use thiserror::Error;

/// Error produced by a [`Transport`](crate::Transport) implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `request`, `get` and `post`.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with a status outside 200..=299.
    #[error("网络响应失败: {status} - {body}")]
    Status { status: u16, body: String },

    /// The transport failed before a response was received.
    #[error(transparent)]
    Transport(TransportError),

    /// The response body was not valid JSON.
    #[error(transparent)]
    Decode(serde_json::Error),

    /// The `post` payload could not be serialized to JSON.
    #[error(transparent)]
    Serialize(serde_json::Error),

    #[error("invalid url: {0:?}")]
    InvalidUrl(String),
}

impl RequestError {
    /// Status code of an HTTP-level failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
