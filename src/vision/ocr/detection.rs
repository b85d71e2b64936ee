// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text region detection
//!
//! Runs the PaddleOCR detection model and turns its text-probability map
//! into axis-aligned boxes via connected-component analysis.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

/// Pixels below this probability are not considered text
const MASK_THRESHOLD: f32 = 0.3;

/// Connected regions smaller than this many pixels are discarded as noise
const MIN_REGION_PIXELS: usize = 10;

/// A detected text box in detection-input coordinates
#[derive(Debug, Clone)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Mean text probability over the region (0.0-1.0)
    pub confidence: f32,
}

/// PaddleOCR detection model session
pub struct TextDetector {
    session: Mutex<Session>,
    input_name: String,
}

impl TextDetector {
    /// Load the detection model from an ONNX file (CPU-only)
    pub fn new(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("OCR detection model not found: {}", model_path.display());
        }

        let session = Session::builder()
            .context("failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("failed to set optimization level")?
            .with_intra_threads(4)
            .context("failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("failed to load detection model from {}", model_path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        debug!("detection model loaded, input: {}", input_name);

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Run detection on a preprocessed `[1, 3, H, W]` tensor
    ///
    /// Boxes come back sorted in reading order: top to bottom, then left to
    /// right.
    pub fn detect(&self, input: &Array4<f32>) -> Result<Vec<TextBox>> {
        let shape = input.shape();
        if shape.len() != 4 || shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("invalid detection input shape: {:?}, expected [1, 3, H, W]", shape);
        }
        let (input_h, input_w) = (shape[2], shape[3]);

        let flat: Vec<f32> = input.iter().copied().collect();
        let tensor =
            Tensor::from_array(([1i64, 3, input_h as i64, input_w as i64], flat))
                .context("failed to build detection input tensor")?;

        let mut session = self.session.lock().expect("detection session poisoned");
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .context("detection inference failed")?;

        let (out_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("failed to extract probability map")?;

        // Probability map is [1, 1, H, W]; the last two dims are the grid
        let dims = out_shape.len();
        if dims < 2 {
            anyhow::bail!("unexpected detection output shape: {:?}", out_shape);
        }
        let map_h = out_shape[dims - 2] as usize;
        let map_w = out_shape[dims - 1] as usize;

        let mut boxes = boxes_from_map(&data[..map_h * map_w], map_h, map_w);

        // Map from probability-map space to detection-input space
        let scale_x = input_w as f32 / map_w as f32;
        let scale_y = input_h as f32 / map_h as f32;
        for text_box in &mut boxes {
            text_box.x *= scale_x;
            text_box.y *= scale_y;
            text_box.width *= scale_x;
            text_box.height *= scale_y;
        }

        boxes.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        debug!("detected {} text regions", boxes.len());
        Ok(boxes)
    }
}

/// Extract connected components above [`MASK_THRESHOLD`] from a flat
/// probability map and return their bounding boxes.
fn boxes_from_map(map: &[f32], height: usize, width: usize) -> Vec<TextBox> {
    let mut visited = vec![false; height * width];
    let mut boxes = Vec::new();

    for start in 0..map.len() {
        if visited[start] || map[start] < MASK_THRESHOLD {
            continue;
        }

        // Flood fill the component, tracking its extent and mean probability
        let mut stack = vec![start];
        let (mut min_x, mut max_x) = (start % width, start % width);
        let (mut min_y, mut max_y) = (start / width, start / width);
        let mut pixels = 0usize;
        let mut prob_sum = 0.0f32;

        while let Some(idx) = stack.pop() {
            if visited[idx] || map[idx] < MASK_THRESHOLD {
                continue;
            }
            visited[idx] = true;
            pixels += 1;
            prob_sum += map[idx];

            let (x, y) = (idx % width, idx / width);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);

            if x > 0 {
                stack.push(idx - 1);
            }
            if x + 1 < width {
                stack.push(idx + 1);
            }
            if y > 0 {
                stack.push(idx - width);
            }
            if y + 1 < height {
                stack.push(idx + width);
            }
        }

        if pixels >= MIN_REGION_PIXELS {
            boxes.push(TextBox {
                x: min_x as f32,
                y: min_y as f32,
                width: (max_x - min_x + 1) as f32,
                height: (max_y - min_y + 1) as f32,
                confidence: prob_sum / pixels as f32,
            });
        }
    }

    boxes
}
