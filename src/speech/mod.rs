// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Speech-to-text: trait seam plus the ONNX ASR engine
//!
//! The transcription capability sits behind [`Transcriber`] so request
//! handlers and tests never touch a concrete model. The shipped engine in
//! [`engine`] runs a parakeet-tdt ONNX pipeline on CPU.

pub mod audio;
pub mod engine;

pub use engine::AsrEngine;

use std::path::Path;

use thiserror::Error;

/// Output of a transcription call
#[derive(Debug, Clone)]
pub struct Transcription {
    /// The transcribed text, as produced by the engine (untrimmed)
    pub text: String,
    /// Language tag if the engine reports one
    pub language: Option<String>,
}

/// Errors from the speech engine
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Model files not found or failed to load
    #[error("model not available: {0}")]
    ModelNotAvailable(String),

    /// ONNX session creation or inference failure
    #[error("inference error: {0}")]
    Inference(String),

    /// Audio decoding failure (unsupported format, corrupt data)
    #[error("audio decode error: {0}")]
    AudioDecode(String),

    /// Resampling failure
    #[error("resample error: {0}")]
    Resample(String),

    /// File read/write failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A speech-to-text capability: audio file in, transcription out
///
/// Input is a path to a decodable audio file. Implementations run
/// synchronously on the calling thread.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: &Path) -> Result<Transcription, SpeechError>;
}
