//! JSON request/response helpers over an HTTP transport.
//!
//! # Overview
//! `request`, `get` and `post` perform one HTTP call each, merge the default
//! `Content-Type: application/json` header with caller headers, fail on any
//! non-2xx status and decode the body as JSON (or return raw bytes when
//! `ResponseType::ArrayBuffer` is requested).
//!
//! # Design
//! - `JsonClient` is stateless: it holds a transport and an optional base URL.
//! - Each call is split into `build_request` (pure), `Transport::execute`
//!   (I/O) and `parse_response` (pure), so the I/O boundary is explicit.
//! - `ReqwestTransport` is the default transport; anything implementing
//!   `Transport` can replace it.
//!
//! ```no_run
//! # async fn run() -> Result<(), json_request::RequestError> {
//! use json_request::RequestOptions;
//!
//! let item = json_request::get("http://localhost:3000/api/items", RequestOptions::new()).await?;
//! println!("{:?}", item.as_json());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{get, merge_headers, parse_response, post, request, JsonClient};
pub use error::{RequestError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{RequestOptions, Response, ResponseType};
