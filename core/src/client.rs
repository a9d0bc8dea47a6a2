//! JSON request helpers over a pluggable transport.
//!
//! # Design
//! `JsonClient` holds only a transport and an optional base URL and carries no
//! mutable state between calls. Every call is split into three steps:
//! `build_request` produces an `HttpRequest` (URL resolution, header merge),
//! the transport performs the round-trip, and `parse_response` checks the
//! status and decodes the body. Only the middle step does I/O.
//!
//! `get` and `post` always go through `request`.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{RequestOptions, Response, ResponseType};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Stateless JSON client.
///
/// Relative URLs are joined to the base URL when one is configured; absolute
/// URLs are always used as given.
#[derive(Debug, Clone, Default)]
pub struct JsonClient<T = ReqwestTransport> {
    base_url: Option<String>,
    transport: T,
}

impl JsonClient<ReqwestTransport> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::new().base_url(base_url)
    }
}

impl<T: Transport> JsonClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            base_url: None,
            transport,
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve the URL and merge headers without touching the network.
    pub fn build_request(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest, RequestError> {
        if url.trim().is_empty() {
            return Err(RequestError::InvalidUrl(url.to_string()));
        }
        Ok(HttpRequest {
            method: options.method.unwrap_or_default(),
            url: self.resolve_url(url),
            headers: merge_headers(options.headers),
            body: options.body,
            timeout: options.timeout,
        })
    }

    /// Perform one request and decode the response.
    pub async fn request(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, RequestError> {
        let response_type = options.response_type;
        let request = self.build_request(url, options)?;
        let method = request.method;
        let url = request.url.clone();

        debug!(%method, %url, "sending request");
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(RequestError::Transport)?;
        debug!(%method, %url, status = response.status, "received response");

        if !response.is_success() {
            warn!(%method, %url, status = response.status, "request failed");
        }
        parse_response(response, response_type)
    }

    /// `request` with the method forced to GET.
    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<Response, RequestError> {
        self.request(url, get_options(options)).await
    }

    /// `request` with the method forced to POST and `body` sent as JSON text.
    pub async fn post<B>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<Response, RequestError>
    where
        B: Serialize + ?Sized,
    {
        self.request(url, post_options(body, options)?).await
    }

    fn resolve_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !is_absolute(url) => {
                format!("{base}/{}", url.trim_start_matches('/'))
            }
            _ => url.to_string(),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn get_options(options: RequestOptions) -> RequestOptions {
    RequestOptions {
        method: Some(HttpMethod::Get),
        ..options
    }
}

fn post_options<B>(body: &B, options: RequestOptions) -> Result<RequestOptions, RequestError>
where
    B: Serialize + ?Sized,
{
    let body = serde_json::to_string(body).map_err(RequestError::Serialize)?;
    Ok(RequestOptions {
        method: Some(HttpMethod::Post),
        body: Some(body),
        ..options
    })
}

/// Overlay caller headers on the default `Content-Type: application/json`.
///
/// Names compare ASCII case-insensitively and a later entry replaces an
/// earlier one, so the caller's value wins on collision.
pub fn merge_headers(overrides: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
    for (name, value) in overrides {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        headers.push((name, value));
    }
    headers
}

/// Check the status and decode the body according to `response_type`.
pub fn parse_response(
    response: HttpResponse,
    response_type: ResponseType,
) -> Result<Response, RequestError> {
    if !response.is_success() {
        return Err(RequestError::Status {
            status: response.status,
            body: response.text(),
        });
    }
    match response_type {
        ResponseType::ArrayBuffer => Ok(Response::Binary(response.body)),
        ResponseType::Json => serde_json::from_slice::<Value>(&response.body)
            .map(Response::Json)
            .map_err(RequestError::Decode),
    }
}

/// One-off `request` through a fresh default client.
///
/// Reuse a [`JsonClient`] instead when making many calls, so the connection
/// pool is shared.
pub async fn request(url: &str, options: RequestOptions) -> Result<Response, RequestError> {
    JsonClient::new().request(url, options).await
}

/// One-off `get` through a fresh default client.
pub async fn get(url: &str, options: RequestOptions) -> Result<Response, RequestError> {
    JsonClient::new().get(url, options).await
}

/// One-off `post` through a fresh default client.
pub async fn post<B>(url: &str, body: &B, options: RequestOptions) -> Result<Response, RequestError>
where
    B: Serialize + ?Sized,
{
    JsonClient::new().post(url, body, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> JsonClient {
        JsonClient::with_base_url("http://localhost:3000")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn default_content_type_is_json() {
        let req = client()
            .build_request("/api/items", RequestOptions::new())
            .unwrap();
        assert_eq!(req.header("content-type"), Some(APPLICATION_JSON));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn caller_content_type_replaces_default() {
        let options = RequestOptions::new().header("content-type", "text/plain");
        let req = client().build_request("/upload", options).unwrap();
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "text/plain".to_string())]
        );
    }

    #[test]
    fn extra_headers_are_kept_alongside_default() {
        let options = RequestOptions::new()
            .header("Authorization", "Bearer abc")
            .header("X-Request-Id", "42");
        let req = client().build_request("/api/items", options).unwrap();
        assert_eq!(req.header(CONTENT_TYPE), Some(APPLICATION_JSON));
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert_eq!(req.header("x-request-id"), Some("42"));
    }

    #[test]
    fn later_duplicate_header_wins() {
        let merged = merge_headers(vec![
            ("X-Mode".to_string(), "a".to_string()),
            ("x-mode".to_string(), "b".to_string()),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1], ("x-mode".to_string(), "b".to_string()));
    }

    #[test]
    fn method_defaults_to_get() {
        let req = client().build_request("/a", RequestOptions::new()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
    }

    #[test]
    fn get_overrides_caller_method() {
        let options = get_options(RequestOptions::new().method(HttpMethod::Delete));
        assert_eq!(options.method, Some(HttpMethod::Get));
    }

    #[test]
    fn post_overrides_caller_method_and_body() {
        let options = RequestOptions::new()
            .method(HttpMethod::Put)
            .body("stale")
            .header("X-Keep", "yes");
        let options = post_options(&json!({"name": "x"}), options).unwrap();
        assert_eq!(options.method, Some(HttpMethod::Post));
        assert_eq!(options.body.as_deref(), Some(r#"{"name":"x"}"#));
        assert_eq!(options.headers, vec![("X-Keep".to_string(), "yes".to_string())]);
    }

    #[test]
    fn post_serialize_failure_is_reported() {
        use std::collections::HashMap;
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], 1);
        let err = post_options(&bad, RequestOptions::new()).unwrap_err();
        assert!(matches!(err, RequestError::Serialize(_)));
    }

    #[test]
    fn relative_url_joins_base() {
        let req = client().build_request("api/items", RequestOptions::new()).unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/items");
        let req = client().build_request("/api/items", RequestOptions::new()).unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/items");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = JsonClient::with_base_url("http://localhost:3000/");
        let req = client.build_request("/api/items", RequestOptions::new()).unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/items");
    }

    #[test]
    fn absolute_url_ignores_base() {
        let req = client()
            .build_request("HTTPS://example.com/x", RequestOptions::new())
            .unwrap();
        assert_eq!(req.url, "HTTPS://example.com/x");
    }

    #[test]
    fn relative_url_without_base_is_untouched() {
        let req = JsonClient::new()
            .build_request("/api/items", RequestOptions::new())
            .unwrap();
        assert_eq!(req.url, "/api/items");
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = client().build_request("  ", RequestOptions::new()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl(_)));
    }

    #[test]
    fn timeout_is_forwarded() {
        let options = RequestOptions::new().timeout(std::time::Duration::from_millis(250));
        let req = client().build_request("/a", options).unwrap();
        assert_eq!(req.timeout, Some(std::time::Duration::from_millis(250)));
    }

    #[test]
    fn parse_json_success() {
        let resp = parse_response(ok(r#"{"id":1}"#), ResponseType::Json).unwrap();
        assert_eq!(resp, Response::Json(json!({"id": 1})));
    }

    #[test]
    fn parse_array_buffer_skips_json() {
        let resp = parse_response(ok("not json"), ResponseType::ArrayBuffer).unwrap();
        assert_eq!(resp, Response::Binary(b"not json".to_vec()));
    }

    #[test]
    fn parse_bad_json() {
        let err = parse_response(ok("not json"), ResponseType::Json).unwrap_err();
        assert!(matches!(err, RequestError::Decode(_)));
    }

    #[test]
    fn parse_failure_status_wins_over_decode() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: b"bad request".to_vec(),
        };
        let err = parse_response(response, ResponseType::ArrayBuffer).unwrap_err();
        assert_eq!(err.to_string(), "网络响应失败: 500 - bad request");
    }

    #[test]
    fn parse_redirect_status_is_failure() {
        let response = HttpResponse {
            status: 304,
            headers: Vec::new(),
            body: Vec::new(),
        };
        let err = parse_response(response, ResponseType::Json).unwrap_err();
        assert!(matches!(err, RequestError::Status { status: 304, .. }));
        assert_eq!(err.to_string(), "网络响应失败: 304 - ");
    }
}
