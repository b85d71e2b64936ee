// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod registry;
pub mod speech;
pub mod text;
pub mod version;
pub mod vision;

// Re-export the types request handlers and tests work with
pub use config::ServiceConfig;
pub use registry::{ModelRegistry, ModelStatus};
pub use speech::{SpeechError, Transcriber, Transcription};
pub use vision::{BoundingBox, Detection, TextRecognizer};
