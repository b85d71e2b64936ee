// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading for the recognition path

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Maximum image payload size (10MB)
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Errors from decoding an uploaded image payload
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("image data is empty")]
    EmptyData,

    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("failed to decode image: {0}")]
    DecodeFailed(String),
}

/// Metadata extracted while decoding
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub size_bytes: usize,
}

/// Decode raw uploaded bytes into a pixel buffer
///
/// The format is sniffed from magic bytes rather than trusted from the
/// upload, so a mislabeled file still decodes (or fails) honestly.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        _ => Err(ImageError::UnsupportedFormat),
    }
}
