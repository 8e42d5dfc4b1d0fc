#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use bizdash_api::config::ServerConfig;
use bizdash_api::router::build_app_router;
use bizdash_api::state::AppState;
use bizdash_backend::StaticBackend;
use bizdash_store::{LayoutStore, MemoryStore};
use bizdash_widgets::{QueryCache, WidgetResolver};

/// Viewer id sent by the helpers that need one.
pub const VIEWER: &str = "u1";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. The refresh job is disabled and the
/// retry delay is zero.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        backend_url: "http://backend.test/api".to_string(),
        backend_token: None,
        backend_timeout_secs: 5,
        layout_store_dir: None,
        widget_refresh_secs: 0,
        widget_max_age_secs: 300,
        widget_retry_delay_ms: 0,
    }
}

/// Build the full application router over an in-memory layout store and the
/// given static backend.
///
/// Uses the same [`build_app_router`] as `main.rs`, so integration tests
/// exercise the production middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery).
pub fn build_test_app(backend: Arc<StaticBackend>) -> Router {
    let config = test_config();
    let resolver = WidgetResolver::new(backend.clone()).with_retry_delay(Duration::ZERO);

    let state = AppState {
        config: Arc::new(config.clone()),
        layouts: LayoutStore::new(Arc::new(MemoryStore::new())),
        backend,
        widgets: Arc::new(QueryCache::new(resolver)),
    };

    build_app_router(state, &config)
}

/// App over an empty backend: every list is empty, every aggregate 404s.
pub fn empty_app() -> Router {
    build_test_app(Arc::new(StaticBackend::new()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    viewer: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(viewer) = viewer {
        builder = builder.header("x-viewer-id", viewer);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

/// `GET` without a viewer header.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// `GET` as [`VIEWER`].
pub async fn get_as(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(VIEWER), None).await
}

/// `GET` as an explicit viewer.
pub async fn get_as_viewer(app: &Router, uri: &str, viewer: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(viewer), None).await
}

/// `POST` a JSON body as [`VIEWER`].
pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(VIEWER), Some(body)).await
}

/// `PUT` a JSON body as [`VIEWER`].
pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(VIEWER), Some(body)).await
}

/// `DELETE` as [`VIEWER`].
pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(VIEWER), None).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
