// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR response types

use serde::Serialize;

use crate::vision::{Detection, FilteredDetections};

/// Response from image text extraction
#[derive(Debug, Clone, Serialize)]
pub struct ImageTextResponse {
    pub success: bool,
    /// Retained texts joined by single spaces
    pub full_text: String,
    /// Retained detections in reading order, geometry passed through
    pub detailed_results: Vec<Detection>,
    pub total_items: usize,
}

impl ImageTextResponse {
    pub fn new(filtered: FilteredDetections) -> Self {
        Self {
            success: true,
            full_text: filtered.full_text,
            total_items: filtered.retained.len(),
            detailed_results: filtered.retained,
        }
    }
}
