//! Adaptive image delivery: raw streaming or on-demand resize.
//!
//! Decides per request whether stored bytes go out unchanged or as a
//! re-oriented, resized, re-encoded variant. Nothing is cached; every
//! transformed response is produced in memory and discarded with it.

pub mod codec;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;
use thiserror::Error;

use crate::media::{MediaKind, classify};
use crate::metrics::Metrics;
use codec::{CodecError, ImageCodec};

/// Default JPEG quality when the request does not pin one.
pub const DEFAULT_QUALITY: u8 = 85;

/// Case-insensitive User-Agent markers that select the mobile default width.
const MOBILE_KEYWORDS: &[&str] = &["mobile", "android", "iphone", "ipad", "ipod"];

/// Heuristic device class from the client-identifier string. Only used to
/// pick a default resize width, never to gate content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientHint {
    Generic,
    Mobile,
}

impl ClientHint {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if MOBILE_KEYWORDS.iter().any(|keyword| ua.contains(keyword)) {
            ClientHint::Mobile
        } else {
            ClientHint::Generic
        }
    }
}

/// Validated per-request transform parameters.
#[derive(Debug, Clone, Copy)]
pub struct TransformRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: u8,
    pub client: ClientHint,
}

/// How the requested media should be delivered.
#[derive(Debug)]
pub enum Served {
    /// Stream the stored file unchanged.
    Raw { path: PathBuf, content_type: String },
    /// In-memory re-encoded variant.
    Transformed { bytes: Vec<u8>, content_type: String },
}

#[derive(Debug, Error)]
pub enum ServeError {
    /// Path escapes the archive root or the file does not exist.
    #[error("media not found")]
    NotFound,
}

/// Stateless media server for one archive root.
///
/// Holds the injected codec and metrics handles; carries no per-request
/// state, so concurrent requests never contend.
pub struct Transformer {
    archive_root: PathBuf,
    mobile_default_width: u32,
    codec: Arc<dyn ImageCodec>,
    metrics: Metrics,
}

impl Transformer {
    pub fn new(
        archive_root: PathBuf,
        mobile_default_width: u32,
        codec: Arc<dyn ImageCodec>,
        metrics: Metrics,
    ) -> Self {
        Self {
            archive_root,
            mobile_default_width,
            codec,
            metrics,
        }
    }

    /// Resolve `relative_path` inside the archive and decide how to serve it.
    ///
    /// Decision ladder, in order: path containment, raw stream for untouched
    /// requests, mobile default width, raw stream for non-image files, then
    /// decode → orient → resize → encode. Any codec failure degrades to the
    /// raw stream; only a missing file is an error.
    pub fn serve(&self, relative_path: &str, request: TransformRequest) -> Result<Served, ServeError> {
        let path = self.resolve(relative_path).ok_or(ServeError::NotFound)?;

        let mut width = request.width;
        if width.is_none() && request.height.is_none() {
            if request.client == ClientHint::Mobile {
                width = Some(self.mobile_default_width);
            } else {
                return Ok(raw(path));
            }
        }

        if classify(relative_path) != MediaKind::Image {
            return Ok(raw(path));
        }

        match self.transform(&path, width, request.height, request.quality) {
            Ok(served) => Ok(served),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "image transform failed, streaming original"
                );
                self.metrics.record_transform_fallback();
                Ok(raw(path))
            }
        }
    }

    /// Normalize a client-supplied path and require it to stay inside the
    /// archive root and name an existing file.
    fn resolve(&self, relative_path: &str) -> Option<PathBuf> {
        let root = self.archive_root.canonicalize().ok()?;
        let candidate = root
            .join(relative_path.trim_start_matches('/'))
            .canonicalize()
            .ok()?;
        if candidate.starts_with(&root) && candidate.is_file() {
            Some(candidate)
        } else {
            None
        }
    }

    fn transform(
        &self,
        path: &Path,
        width: Option<u32>,
        height: Option<u32>,
        quality: u8,
    ) -> Result<Served, CodecError> {
        let image = self.codec.decode_oriented(path)?;
        let format = output_format(path);

        let source = (image.width(), image.height());
        let (target_w, target_h) = target_dimensions(source, width, height);

        // Never upscale: resample only when the target is strictly smaller
        // in at least one dimension.
        let image = if target_w < source.0 || target_h < source.1 {
            self.codec.resize(&image, target_w, target_h)
        } else {
            image
        };

        let bytes = self
            .codec
            .encode(&image, format, quality.clamp(1, 100))?;
        Ok(Served::Transformed {
            bytes,
            content_type: format.to_mime_type().to_string(),
        })
    }
}

/// Output format for a transformed image. HEIC (and anything else without a
/// web-standard encoder) comes back as JPEG; web formats keep their own.
fn output_format(path: &Path) -> ImageFormat {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => ImageFormat::Png,
        Some("gif") => ImageFormat::Gif,
        _ => ImageFormat::Jpeg,
    }
}

/// Target dimensions for a resize request.
///
/// Both given: taken as-is (aspect is the caller's responsibility). One
/// given: the other is derived preserving the source aspect ratio. Neither:
/// source dimensions.
fn target_dimensions(source: (u32, u32), width: Option<u32>, height: Option<u32>) -> (u32, u32) {
    let (src_w, src_h) = source;
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, (w as f64 * src_h as f64 / src_w as f64).round() as u32),
        (None, Some(h)) => ((h as f64 * src_w as f64 / src_h as f64).round() as u32, h),
        (None, None) => (src_w, src_h),
    }
}

fn raw(path: PathBuf) -> Served {
    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();
    Served::Raw { path, content_type }
}
