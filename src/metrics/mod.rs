//! Prometheus metrics: owned registry plus request instrumentation.
//!
//! The registry lives in [`AppState`](crate::AppState) and is injected
//! wherever a counter is needed; nothing here is process-global.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};

/// Thread-safe metrics handle, cheap to clone across handlers.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests: CounterVec,
    http_duration: HistogramVec,
    transform_fallbacks: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let http_requests = CounterVec::new(
            Opts::new("memoria_http_requests_total", "HTTP requests served"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests.clone()))?;

        let http_duration = HistogramVec::new(
            HistogramOpts::new(
                "memoria_http_request_duration_seconds",
                "HTTP request latency in seconds",
            ),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_duration.clone()))?;

        let transform_fallbacks = IntCounter::new(
            "memoria_transform_fallbacks_total",
            "Image transforms that degraded to raw streaming",
        )?;
        registry.register(Box::new(transform_fallbacks.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests,
                http_duration,
                transform_fallbacks,
            }),
        })
    }

    pub fn record_request(&self, method: &str, path: &str, status: u16, seconds: f64) {
        self.inner
            .http_requests
            .with_label_values(&[method, path, &status.to_string()])
            .inc();
        self.inner
            .http_duration
            .with_label_values(&[method, path])
            .observe(seconds);
    }

    pub fn record_transform_fallback(&self) {
        self.inner.transform_fallbacks.inc();
    }

    /// Encode the registry in Prometheus text exposition format.
    /// Returns `(content_type, body)`.
    pub fn export(&self) -> anyhow::Result<(String, String)> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.inner.registry.gather(), &mut buffer)?;
        Ok((
            encoder.format_type().to_string(),
            String::from_utf8(buffer)?,
        ))
    }
}

/// Axum middleware recording count and latency per matched route.
pub async fn track_requests(
    State(state): State<crate::AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    // Label by route template, not the raw URI, to keep cardinality bounded.
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    state.metrics.record_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
