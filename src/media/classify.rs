//! Media type classification by filename extension.
//!
//! The archive is written by an external importer and may contain anything;
//! only the extensions below are surfaced to viewers. Everything else is
//! `Unknown` and dropped from lookup results.

/// Image extensions the viewer understands (lowercase).
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "heic"];

/// Video extensions the viewer understands (lowercase).
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Coarse media category derived from a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Unknown,
}

/// Classify a filename by its extension, case-insensitively.
///
/// Pure and total: depends only on the lowercase suffix and always returns
/// one of the three kinds.
pub fn classify(filename: &str) -> MediaKind {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return MediaKind::Unknown;
    };
    let ext = ext.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else {
        MediaKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_images() {
        assert_eq!(classify("a.png"), MediaKind::Image);
        assert_eq!(classify("a.jpg"), MediaKind::Image);
        assert_eq!(classify("a.jpeg"), MediaKind::Image);
        assert_eq!(classify("a.gif"), MediaKind::Image);
        assert_eq!(classify("IMG_0001.HEIC"), MediaKind::Image);
    }

    #[test]
    fn test_classify_videos() {
        assert_eq!(classify("clip.mp4"), MediaKind::Video);
        assert_eq!(classify("clip.MOV"), MediaKind::Video);
        assert_eq!(classify("clip.avi"), MediaKind::Video);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("notes.txt"), MediaKind::Unknown);
        assert_eq!(classify("photo.jpg.supplemental-metadata.json"), MediaKind::Unknown);
        assert_eq!(classify("no_extension"), MediaKind::Unknown);
        assert_eq!(classify(""), MediaKind::Unknown);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let name = "Trip.To.Paris.JPEG";
        assert_eq!(classify(name), classify(name));
    }
}
