// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transcription response types

use serde::{Deserialize, Serialize};

/// Reported confidence for every transcription.
///
/// The speech engine does not produce a confidence signal, so this is a
/// constant placeholder in the contract, not a measurement.
pub const TRANSCRIPTION_CONFIDENCE: f32 = 1.0;

/// Language reported when the engine does not identify one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Response from audio transcription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub success: bool,
    /// Transcribed text, trimmed of leading/trailing whitespace
    pub text: String,
    /// Language tag from the engine, or [`DEFAULT_LANGUAGE`]
    pub language: String,
    pub confidence: f32,
}

impl TranscribeResponse {
    pub fn new(text: &str, language: Option<String>) -> Self {
        Self {
            success: true,
            text: text.trim().to_string(),
            language: language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            confidence: TRANSCRIPTION_CONFIDENCE,
        }
    }
}
