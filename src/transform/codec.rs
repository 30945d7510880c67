//! Image codec seam: decode with orientation normalization, resize, encode.
//!
//! The [`ImageCodec`] trait keeps the transform policy independent of the
//! decoding backend. The production implementation is [`RustCodec`] — pure
//! Rust, statically linked: the `image` crate for decode/resize/encode and
//! `kamadak-exif` for the orientation tag.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Decode, resize, and encode capability consumed by the transform policy.
pub trait ImageCodec: Send + Sync {
    /// Decode an image from disk with its EXIF orientation applied, so the
    /// returned pixels are already in display orientation.
    fn decode_oriented(&self, path: &Path) -> Result<DynamicImage, CodecError>;

    /// Resample to exactly `width` x `height`.
    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage;

    /// Encode to an in-memory buffer. `quality` applies to lossy formats.
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Pure Rust codec backed by the `image` crate.
pub struct RustCodec;

impl ImageCodec for RustCodec {
    fn decode_oriented(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        let image = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|err| CodecError::Decode(err.to_string()))?;
        Ok(apply_orientation(image, read_orientation(path)))
    }

    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        // Lanczos keeps downscaled photos free of aliasing artifacts.
        image.resize_exact(width, height, FilterType::Lanczos3)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => {
                // JPEG carries neither alpha nor exotic color models; flatten
                // to RGB8 before encoding (this is also what turns decoded
                // camera-native sources into a web-displayable payload).
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
                image
                    .to_rgb8()
                    .write_with_encoder(encoder)
                    .map_err(|err| CodecError::Encode(err.to_string()))?;
            }
            _ => {
                image
                    .write_to(&mut buffer, format)
                    .map_err(|err| CodecError::Encode(err.to_string()))?;
            }
        }
        Ok(buffer.into_inner())
    }
}

/// Best-effort EXIF orientation read; 1 (upright) when absent or unreadable.
fn read_orientation(path: &Path) -> u32 {
    let Ok(file) = std::fs::File::open(path) else {
        return 1;
    };
    let mut reader = std::io::BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(meta) => meta
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .unwrap_or(1),
        Err(_) => 1,
    }
}

/// Apply one of the eight EXIF orientation values to the decoded pixels.
fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn two_by_one() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_orientation_rotations_change_dimensions() {
        let rotated = apply_orientation(two_by_one(), 6);
        assert_eq!((rotated.width(), rotated.height()), (1, 2));

        let upside_down = apply_orientation(two_by_one(), 3);
        assert_eq!((upside_down.width(), upside_down.height()), (2, 1));
        // 180-degree rotation swaps the two pixels.
        assert_eq!(upside_down.to_rgb8().get_pixel(0, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_orientation_upright_is_identity() {
        let img = apply_orientation(two_by_one(), 1);
        assert_eq!(img.to_rgb8().get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_orientation_without_exif_defaults_upright() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.png");
        two_by_one().save(&path).unwrap();
        assert_eq!(read_orientation(&path), 1);
    }

    #[test]
    fn test_decode_oriented_applies_exif_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotated.jpg");

        // APP1 Exif segment carrying a single IFD0 entry:
        // Orientation (0x0112) = 6, i.e. rotate 90 degrees clockwise.
        const APP1: &[u8] = &[
            0xFF, 0xE1, 0x00, 0x22, // APP1 marker, segment length 34
            b'E', b'x', b'i', b'f', 0x00, 0x00,
            0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // little-endian TIFF, IFD0 at 8
            0x01, 0x00, // one entry
            0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, // tag 0x0112, SHORT, count 1
            0x06, 0x00, 0x00, 0x00, // value 6
            0x00, 0x00, 0x00, 0x00, // no next IFD
        ];

        let encoded = RustCodec.encode(&two_by_one(), ImageFormat::Jpeg, 90).unwrap();
        // Splice the Exif segment in right after the SOI marker.
        let mut bytes = Vec::with_capacity(encoded.len() + APP1.len());
        bytes.extend_from_slice(&encoded[..2]);
        bytes.extend_from_slice(APP1);
        bytes.extend_from_slice(&encoded[2..]);
        std::fs::write(&path, &bytes).unwrap();

        assert_eq!(read_orientation(&path), 6);
        // A 2x1 source must come back 1x2 once the rotation is applied.
        let decoded = RustCodec.decode_oriented(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1, 2));
    }

    #[test]
    fn test_decode_oriented_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        assert!(RustCodec.decode_oriented(&path).is_err());
    }

    #[test]
    fn test_encode_jpeg_roundtrip() {
        let bytes = RustCodec
            .encode(&two_by_one(), ImageFormat::Jpeg, 85)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 1));
    }

    #[test]
    fn test_resize_is_exact() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(16, 12));
        let resized = RustCodec.resize(&img, 4, 3);
        assert_eq!((resized.width(), resized.height()), (4, 3));
    }
}
