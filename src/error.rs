//! HTTP error taxonomy shared by the api handlers.
//!
//! Client input problems surface as 400 with an explicit message, missing or
//! out-of-root media as 404, everything else as a logged 500. No error here
//! ever takes the process down.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::transform::ServeError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed client input (dates, dimensions, quality).
    #[error("{0}")]
    BadRequest(String),

    /// Path escapes the archive root or the file does not exist.
    #[error("media not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ServeError> for ApiError {
    fn from(err: ServeError) -> Self {
        match err {
            ServeError::NotFound => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
