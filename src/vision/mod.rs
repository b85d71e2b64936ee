// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing: image decoding, text recognition, result filtering
//!
//! The recognition capability sits behind the [`TextRecognizer`] trait so the
//! request layer (and its tests) never depend on a concrete model. The
//! shipped implementation is a CPU-only two-stage ONNX pipeline in [`ocr`].

pub mod filter;
pub mod image_utils;
pub mod ocr;

pub use filter::{filter_detections, FilteredDetections, CONFIDENCE_THRESHOLD};
pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use ocr::OcrEngine;

use image::DynamicImage;
use serde::Serialize;

/// Bounding box of a detected text region, in original image pixels
///
/// Passed through to API responses unmodified.
#[derive(Debug, Clone, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One recognized unit of text from an image
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// Recognized text content
    pub text: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Where in the image the text was found
    pub bbox: BoundingBox,
}

/// A text recognition capability: image in, ordered detections out
///
/// Implementations run synchronously on the calling thread; callers own the
/// decision of where that blocking work happens.
pub trait TextRecognizer: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>>;
}
