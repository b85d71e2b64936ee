// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR-style text extraction pipeline
//!
//! Two ONNX stages on CPU: `detection` finds text regions in the full image,
//! `recognition` reads each cropped region. Combined here into a
//! [`TextRecognizer`] implementation.
//!
//! Expected files in the model directory:
//! - `det_model.onnx` (text detection)
//! - `rec_model.onnx` (text recognition)
//! - `ppocr_keys_v1.txt` (character dictionary)

pub mod detection;
pub mod preprocessing;
pub mod recognition;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::{BoundingBox, Detection, TextRecognizer};
use detection::TextDetector;
use recognition::LineRecognizer;

/// End-to-end OCR engine: detect regions, recognize each, in reading order
pub struct OcrEngine {
    detector: TextDetector,
    recognizer: LineRecognizer,
}

impl OcrEngine {
    /// Load both OCR models from `model_dir`
    ///
    /// Loading is CPU-heavy, so it runs on a blocking task. Called once at
    /// startup by the model registry.
    pub async fn new(model_dir: &Path) -> Result<Self> {
        let dir = model_dir.to_path_buf();
        tokio::task::spawn_blocking(move || Self::load(&dir))
            .await
            .context("OCR model load task failed")?
    }

    fn load(model_dir: &Path) -> Result<Self> {
        info!("loading OCR models from {}", model_dir.display());
        let paths = OcrModelPaths::from_dir(model_dir);

        let detector = TextDetector::new(&paths.detection)?;
        let recognizer = LineRecognizer::new(&paths.recognition, &paths.dictionary)?;

        info!("OCR engine ready (CPU-only)");
        Ok(Self {
            detector,
            recognizer,
        })
    }

    fn run_pipeline(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (tensor, letterbox) = preprocessing::detection_tensor(image);
        let boxes = self.detector.detect(&tensor)?;

        let (img_w, img_h) = image.dimensions();
        let mut detections = Vec::with_capacity(boxes.len());

        for text_box in boxes {
            // Map the box from detection-input space back onto the image
            let (x0, y0) = letterbox.to_image(text_box.x, text_box.y);
            let (x1, y1) =
                letterbox.to_image(text_box.x + text_box.width, text_box.y + text_box.height);

            let x0 = x0.max(0.0) as u32;
            let y0 = y0.max(0.0) as u32;
            let x1 = (x1.max(0.0) as u32).min(img_w);
            let y1 = (y1.max(0.0) as u32).min(img_h);
            if x1 <= x0 || y1 <= y0 {
                continue;
            }

            let region = image.crop_imm(x0, y0, x1 - x0, y1 - y0);
            let line = self.recognizer.recognize(&region)?;
            if line.text.trim().is_empty() {
                continue;
            }

            detections.push(Detection {
                text: line.text,
                confidence: line.confidence,
                bbox: BoundingBox {
                    x: x0,
                    y: y0,
                    width: x1 - x0,
                    height: y1 - y0,
                },
            });
        }

        debug!("OCR pipeline produced {} detections", detections.len());
        Ok(detections)
    }
}

impl TextRecognizer for OcrEngine {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        self.run_pipeline(image)
    }
}

/// Paths to the model files inside a model directory
#[derive(Debug, Clone)]
pub struct OcrModelPaths {
    pub detection: PathBuf,
    pub recognition: PathBuf,
    pub dictionary: PathBuf,
}

impl OcrModelPaths {
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            detection: dir.join("det_model.onnx"),
            recognition: dir.join("rec_model.onnx"),
            dictionary: dir.join("ppocr_keys_v1.txt"),
        }
    }
}
