//! Memoria — self-hosted "on this day" photo memories server.
//!
//! Serves media captured on today's month/day in prior years from a
//! read-only `YYYY_MM_DD` folder archive, resizing images on demand for the
//! requesting device. The archive is written by an external importer; this
//! process only ever reads it.

mod api;
mod archive;
mod config;
mod error;
mod media;
mod metrics;
mod transform;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::metrics::Metrics;
use crate::transform::Transformer;
use crate::transform::codec::RustCodec;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub metrics: Metrics,
    pub transformer: Arc<Transformer>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memoria=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Memoria");
    tracing::info!(
        archive = %config.archive_path.display(),
        lookback_years = config.lookback_years,
        "Configuration loaded"
    );

    let metrics = Metrics::new()?;
    let transformer = Arc::new(Transformer::new(
        config.archive_path.clone(),
        config.mobile_default_width,
        Arc::new(RustCodec),
        metrics.clone(),
    ));

    let state = AppState {
        config: config.clone(),
        metrics,
        transformer,
    };

    let app = Router::new()
        .merge(api::health::router())
        .merge(api::pages::router())
        .merge(api::query::router())
        .merge(api::media::router())
        .merge(api::metrics::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::track_requests,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
