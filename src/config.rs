// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment-driven service configuration

use std::env;
use std::path::PathBuf;

/// Default listening port when `PORT` is not set
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration for the service
///
/// All values come from environment variables with working defaults, so a
/// bare `cargo run` with models in `./models/` starts a usable node.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port to listen on; the service binds all interfaces
    pub port: u16,
    /// Directory containing the ASR model files
    pub asr_model_dir: PathBuf,
    /// Directory containing the OCR model files
    pub ocr_model_dir: PathBuf,
}

impl ServiceConfig {
    /// Build the configuration from the process environment
    ///
    /// - `PORT`: listening port (default 5000)
    /// - `ASR_MODEL_DIR`: ASR model directory (default `./models/asr-onnx`)
    /// - `OCR_MODEL_DIR`: OCR model directory (default `./models/paddleocr-onnx`)
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let asr_model_dir = env::var("ASR_MODEL_DIR")
            .unwrap_or_else(|_| "./models/asr-onnx".to_string())
            .into();

        let ocr_model_dir = env::var("OCR_MODEL_DIR")
            .unwrap_or_else(|_| "./models/paddleocr-onnx".to_string())
            .into();

        Self {
            port,
            asr_model_dir,
            ocr_model_dir,
        }
    }

    /// Socket address string the server binds to
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            asr_model_dir: "./models/asr-onnx".into(),
            ocr_model_dir: "./models/paddleocr-onnx".into(),
        }
    }
}
