// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model registry: owns the inference engines for the life of the process
//!
//! Built once at startup and handed to request handlers by reference through
//! the server state; there is no global lookup and no mutation after load.
//! Engines are trait objects so tests can substitute stubs.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::config::ServiceConfig;
use crate::speech::{AsrEngine, Transcriber};
use crate::vision::{OcrEngine, TextRecognizer};

/// Per-capability availability, as reported by the health endpoint
///
/// Field names are the wire contract kept from the service this one
/// replaces.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelStatus {
    pub whisper: bool,
    pub ocr: bool,
}

/// Holds the transcription and recognition capabilities
///
/// Lifecycle is load-once, serve-many: `load()` either produces a registry
/// with both engines present or fails the startup. There is no unload and no
/// hot reload, which is what makes lock-free concurrent reads safe.
pub struct ModelRegistry {
    transcriber: Option<Arc<dyn Transcriber>>,
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl ModelRegistry {
    /// A registry with no engines, as the process looks before `load()`
    pub fn unloaded() -> Self {
        Self {
            transcriber: None,
            recognizer: None,
        }
    }

    /// Acquire both engines; either failure is fatal to startup
    pub async fn load(config: &ServiceConfig) -> Result<Self> {
        info!("loading inference engines...");

        let transcriber = AsrEngine::new(&config.asr_model_dir)
            .await
            .context("failed to load transcription engine")?;
        info!("transcription engine loaded");

        let recognizer = OcrEngine::new(&config.ocr_model_dir)
            .await
            .context("failed to load recognition engine")?;
        info!("recognition engine loaded");

        Ok(Self {
            transcriber: Some(Arc::new(transcriber)),
            recognizer: Some(Arc::new(recognizer)),
        })
    }

    /// Build a registry from already-constructed engines (tests, embedders)
    pub fn with_engines(
        transcriber: Arc<dyn Transcriber>,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            transcriber: Some(transcriber),
            recognizer: Some(recognizer),
        }
    }

    /// The transcription capability, if loaded
    pub fn transcriber(&self) -> Option<Arc<dyn Transcriber>> {
        self.transcriber.clone()
    }

    /// The recognition capability, if loaded
    pub fn recognizer(&self) -> Option<Arc<dyn TextRecognizer>> {
        self.recognizer.clone()
    }

    /// Per-capability availability for the health endpoint
    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            whisper: self.transcriber.is_some(),
            ocr: self.recognizer.is_some(),
        }
    }

    /// True once both capabilities are present
    pub fn is_ready(&self) -> bool {
        self.transcriber.is_some() && self.recognizer.is_some()
    }
}
