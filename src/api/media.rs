//! Raw and transformed media byte serving
//!
//! `GET /media/{*path}?w=&h=&q=` resolves a file inside the archive and
//! either streams it unchanged or hands it to the transform pipeline. Raw
//! bytes go out as a [`ReaderStream`] so a disconnecting client just drops
//! the file handle.

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::AppState;
use crate::error::ApiError;
use crate::transform::{ClientHint, DEFAULT_QUALITY, Served, TransformRequest};

/// Raw query parameters; parsed by hand so malformed values produce an
/// explicit message instead of a generic rejection.
#[derive(Debug, Deserialize)]
struct MediaParams {
    w: Option<String>,
    h: Option<String>,
    q: Option<String>,
}

fn parse_dimension(name: &str, value: Option<&str>) -> Result<Option<u32>, ApiError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
            _ => Err(ApiError::BadRequest(format!(
                "parameter '{name}' must be a positive integer"
            ))),
        },
    }
}

fn parse_quality(value: Option<&str>) -> Result<u8, ApiError> {
    match value {
        None | Some("") => Ok(DEFAULT_QUALITY),
        Some(raw) => match raw.parse::<u8>() {
            Ok(parsed) if (1..=100).contains(&parsed) => Ok(parsed),
            _ => Err(ApiError::BadRequest(
                "parameter 'q' must be an integer between 1 and 100".to_string(),
            )),
        },
    }
}

async fn serve_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<MediaParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let width = parse_dimension("w", params.w.as_deref())?;
    let height = parse_dimension("h", params.h.as_deref())?;
    let quality = parse_quality(params.q.as_deref())?;
    let client = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(ClientHint::from_user_agent)
        .unwrap_or(ClientHint::Generic);

    let request = TransformRequest {
        width,
        height,
        quality,
        client,
    };

    // Decode/resize/encode is CPU-bound; keep it off the runtime workers.
    let transformer = state.transformer.clone();
    let served = tokio::task::spawn_blocking(move || transformer.serve(&path, request))
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;

    match served? {
        Served::Transformed {
            bytes,
            content_type,
        } => Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response()),
        Served::Raw { path, content_type } => {
            let file = tokio::fs::File::open(&path)
                .await
                .map_err(|_| ApiError::NotFound)?;
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type)],
                Body::from_stream(ReaderStream::new(file)),
            )
                .into_response())
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/media/{*path}", get(serve_media))
}
