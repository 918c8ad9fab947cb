//! Router harness over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use book_registry_server::{api, repository::Repository, AppConfig, AppState};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Envelope payload
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn id(&self) -> i64 {
        self.data()["id"].as_i64().expect("response carries no id")
    }
}

pub fn app() -> Router {
    api::router(AppState::new(AppConfig::default(), Repository::memory()))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    send_as(app, method, uri, body, "application/json").await
}

/// Raw body with an explicit content type
pub async fn send_raw(app: &Router, method: Method, uri: &str, body: &str, content_type: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    collect(app, request).await
}

/// PATCH with the merge-patch content type
pub async fn patch(app: &Router, uri: &str, body: Value) -> TestResponse {
    send_as(app, Method::PATCH, uri, Some(body), "application/merge-patch+json").await
}

async fn send_as(app: &Router, method: Method, uri: &str, body: Option<Value>, content_type: &str) -> TestResponse {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();
    collect(app, request).await
}

async fn collect(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse { status, headers, body }
}
