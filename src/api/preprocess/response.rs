// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Preprocessing response types

use serde::Serialize;

use crate::text::NormalizedText;

/// Response from text preprocessing
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessResponse {
    pub success: bool,
    /// The input exactly as received
    pub original_text: String,
    /// The normalized text
    pub cleaned_text: String,
    /// Every configured substitution pattern, in application order
    pub preprocessing_applied: Vec<&'static str>,
}

impl PreprocessResponse {
    pub fn new(original: String, normalized: NormalizedText) -> Self {
        Self {
            success: true,
            original_text: original,
            cleaned_text: normalized.cleaned,
            preprocessing_applied: normalized.patterns,
        }
    }
}
