//! Shared fixtures for router tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::AppState;
use crate::config::Config;
use crate::metrics::Metrics;
use crate::transform::Transformer;
use crate::transform::codec::RustCodec;

/// App state over a fresh temporary archive root.
pub fn test_state() -> (AppState, TempDir) {
    let root = tempfile::tempdir().unwrap();
    let config = Arc::new(Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        archive_path: root.path().to_path_buf(),
        lookback_years: 10,
        mobile_default_width: 800,
    });
    let metrics = Metrics::new().unwrap();
    let transformer = Arc::new(Transformer::new(
        config.archive_path.clone(),
        config.mobile_default_width,
        Arc::new(RustCodec),
        metrics.clone(),
    ));
    (
        AppState {
            config,
            metrics,
            transformer,
        },
        root,
    )
}

/// One-shot GET returning status, content type, and raw body bytes.
pub async fn request_bytes(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    request_with_agent(app, uri, None).await
}

/// One-shot GET with an optional User-Agent header.
pub async fn request_with_agent(
    app: Router,
    uri: &str,
    user_agent: Option<&str>,
) -> (StatusCode, Option<String>, Vec<u8>) {
    let mut builder = Request::builder().uri(uri);
    if let Some(agent) = user_agent {
        builder = builder.header(header::USER_AGENT, agent);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, content_type, bytes)
}

/// One-shot GET decoding the body as JSON.
pub async fn request_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, bytes) = request_bytes(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}
