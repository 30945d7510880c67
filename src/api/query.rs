//! Structured anniversary lookup for API consumers

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Serialize;

use crate::AppState;
use crate::archive::dates::display_date;
use crate::archive::locator::{self, MediaEntry};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct MediaQueryResponse {
    pub images: Vec<MediaEntry>,
    pub videos: Vec<MediaEntry>,
    pub years_found: Vec<i32>,
    pub formatted_date: String,
}

/// Same lookup as the pages, returned flat. Unlike the page routes a bad
/// date here is the caller's bug and gets a 400.
async fn media_query(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<MediaQueryResponse>, ApiError> {
    let target = date.parse::<NaiveDate>().map_err(|_| {
        ApiError::BadRequest(format!("invalid date '{date}', expected YYYY-MM-DD"))
    })?;

    let anniversary = locator::locate(
        &state.config.archive_path,
        target,
        state.config.lookback_years,
    )
    .await;

    let years_found = anniversary.years_found();
    let mut images = Vec::new();
    let mut videos = Vec::new();
    for bucket in anniversary.years {
        images.extend(bucket.images);
        videos.extend(bucket.videos);
    }

    Ok(Json(MediaQueryResponse {
        images,
        videos,
        years_found,
        formatted_date: display_date(target),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/media-query/{date}", get(media_query))
}
