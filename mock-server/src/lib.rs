use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Fixed payload served by `GET /bytes`. Deliberately not valid UTF-8.
pub const BINARY_PAYLOAD: &[u8] = &[0x00, 0x01, 0xfe, 0xff, 0x80, 0x7f];

/// What `/echo` saw on the way in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    /// Header names are lower-case.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/api/items", get(get_item).post(create_item))
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/bytes", get(bytes))
        .route("/not-json", get(not_json))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

/// Serve an arbitrary router, for tests that need a one-off endpoint.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn get_item() -> Json<Value> {
    Json(json!({ "id": 1 }))
}

async fn create_item(Json(input): Json<Value>) -> Response {
    if input.get("fail").and_then(Value::as_bool) == Some(true) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "bad request").into_response();
    }
    let mut item = match input {
        Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    item.insert("id".to_string(), json!(1));
    (StatusCode::CREATED, Json(Value::Object(item))).into_response()
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.as_str().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")).into_response(),
    }
}

async fn bytes() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        BINARY_PAYLOAD,
    )
}

async fn not_json() -> &'static str {
    "not json"
}
