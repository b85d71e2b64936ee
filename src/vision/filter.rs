// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Confidence-based filtering and aggregation of recognition output

use super::Detection;

/// Detections at or below this confidence are dropped from responses.
///
/// Policy value, independent of the recognition model: low-confidence output
/// from noisy regions tends to be garbage characters that poison downstream
/// parsing.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Output of [`filter_detections`]
#[derive(Debug, Clone)]
pub struct FilteredDetections {
    /// Detections above the threshold, in their original order
    pub retained: Vec<Detection>,
    /// Retained texts joined by single spaces
    pub full_text: String,
}

/// Keep detections with `confidence > CONFIDENCE_THRESHOLD` and aggregate
/// their text, preserving detection order.
///
/// Dropped detections are gone entirely; they are not reported or logged.
/// An empty input yields an empty retained list and an empty string.
pub fn filter_detections(detections: Vec<Detection>) -> FilteredDetections {
    let retained: Vec<Detection> = detections
        .into_iter()
        .filter(|d| d.confidence > CONFIDENCE_THRESHOLD)
        .collect();

    let mut full_text = String::new();
    for detection in &retained {
        full_text.push_str(&detection.text);
        full_text.push(' ');
    }
    let full_text = full_text.trim_end().to_string();

    FilteredDetections {
        retained,
        full_text,
    }
}
