//! Anniversary lookup: which media exists for this month/day in prior years.
//!
//! Probes the candidate date folders from [`dates`](super::dates) against the
//! archive root and buckets whatever they hold by year. Everything here is
//! request-scoped; the filesystem tree is the only index.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use super::dates;
use crate::media::{MediaKind, classify};

/// A single archive file surfaced to the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct MediaEntry {
    /// Path relative to the archive root, e.g. `2023_07_15/beach.jpg`.
    pub path: String,
    /// Bare filename, for display.
    pub name: String,
    /// Year the folder belongs to.
    pub year: i32,
}

/// Media found for one prior year.
#[derive(Debug, Clone, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub images: Vec<MediaEntry>,
    pub videos: Vec<MediaEntry>,
}

/// Result of one anniversary lookup.
///
/// `years` holds every year whose folder existed, in probe order (nearest
/// year first). A folder that exists but contains no recognized media still
/// gets a bucket: "found" means the folder was there, not that it was
/// non-empty.
#[derive(Debug, Clone)]
pub struct Anniversary {
    pub target: NaiveDate,
    pub years: Vec<YearBucket>,
}

impl Anniversary {
    /// The found years in probe order.
    pub fn years_found(&self) -> Vec<i32> {
        self.years.iter().map(|bucket| bucket.year).collect()
    }
}

/// Probe the archive for media captured on `target`'s month/day in the
/// previous `lookback_years` years.
///
/// A missing folder is expected and silently excluded. A folder that exists
/// but cannot be listed is logged and treated as not found; it never aborts
/// the scan of the remaining folders.
pub async fn locate(archive_root: &Path, target: NaiveDate, lookback_years: u32) -> Anniversary {
    let mut years = Vec::new();

    for (year, folder) in dates::historical_folders(target, lookback_years) {
        let dir = archive_root.join(&folder);
        let is_dir = tokio::fs::metadata(&dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }

        match list_folder(&dir, &folder, year).await {
            Ok(bucket) => years.push(bucket),
            Err(err) => {
                tracing::warn!(folder = %folder, error = %err, "skipping unreadable archive folder");
            }
        }
    }

    Anniversary { target, years }
}

/// List one date folder and classify its files.
async fn list_folder(dir: &Path, folder: &str, year: i32) -> std::io::Result<YearBucket> {
    let mut bucket = YearBucket {
        year,
        images: Vec::new(),
        videos: Vec::new(),
    };

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let media = MediaEntry {
            path: format!("{folder}/{name}"),
            name,
            year,
        };
        match classify(&media.name) {
            MediaKind::Image => bucket.images.push(media),
            MediaKind::Video => bucket.videos.push(media),
            MediaKind::Unknown => {}
        }
    }

    Ok(bucket)
}
