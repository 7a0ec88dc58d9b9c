// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Image decoding and normalization for the detection pipeline

use image::{imageops::FilterType, DynamicImage, ImageFormat, RgbImage};
use thiserror::Error;

/// Maximum accepted upload size (10MB)
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Side length of the normalized detector input
pub const NORMALIZED_SIZE: u32 = 640;

/// Custom error types for image processing
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Metadata about the uploaded image, taken before normalization
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Original width in pixels
    pub width: u32,
    /// Original height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Upload size in bytes
    pub size_bytes: usize,
}

/// Decode raw uploaded bytes into the normalized detector input.
///
/// The bytes are sniffed for a known raster format, decoded, converted to
/// 3-channel RGB and resized to 640x640. Returns the normalized image along
/// with metadata describing the original upload.
pub fn decode_to_normalized(bytes: &[u8]) -> Result<(RgbImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    // Detect format from magic bytes
    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((normalize(img), info))
}

/// Convert to RGB and resize to the fixed detector input resolution.
fn normalize(img: DynamicImage) -> RgbImage {
    let rgb = img.to_rgb8();
    if rgb.dimensions() == (NORMALIZED_SIZE, NORMALIZED_SIZE) {
        return rgb;
    }
    image::imageops::resize(&rgb, NORMALIZED_SIZE, NORMALIZED_SIZE, FilterType::Triangle)
}

/// Detect image format from magic bytes
///
/// # Returns
/// * `Ok(ImageFormat)` - Detected format
/// * `Err(ImageError::UnsupportedFormat)` - If format cannot be detected
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}
