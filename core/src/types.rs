//! Per-call option and result types.
//!
//! # Design
//! `RequestOptions` is the typed form of a loose options bag: the recognized
//! fields are explicit, and `timeout` is the one transport pass-through field.
//! Nothing here outlives a single call.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::HttpMethod;

/// How a successful response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Parse the body as JSON.
    #[default]
    Json,
    /// Return the raw body bytes without interpreting them.
    ArrayBuffer,
}

/// Options for a single request.
///
/// Caller `headers` are merged over the default
/// `Content-Type: application/json`; on a name collision the caller wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Defaults to GET when unset.
    pub method: Option<HttpMethod>,
    pub headers: Vec<(String, String)>,
    /// Pre-serialized payload.
    pub body: Option<String>,
    pub response_type: ResponseType,
    /// Passed through to the transport. Not enforced by the client.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Json(Value),
    Binary(Vec<u8>),
}

impl Response {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Response::Json(value) => Some(value),
            Response::Binary(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Response::Json(value) => Some(value),
            Response::Binary(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Response::Binary(bytes) => Some(bytes),
            Response::Json(_) => None,
        }
    }

    /// Deserialize a JSON response into `T`.
    ///
    /// Returns `None` for a binary response.
    pub fn deserialize<T: DeserializeOwned>(self) -> Option<serde_json::Result<T>> {
        self.into_json().map(serde_json::from_value)
    }
}
