// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transcription endpoint handler

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, error};

use super::response::TranscribeResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::multipart::read_file_field;

/// POST /audio-to-text - Transcribe an uploaded audio file
///
/// Accepts a multipart form with a single `audio` file field.
///
/// # Errors
/// - 400 Bad Request: no `audio` field in the request
/// - 500 Internal Server Error: the engine could not process the payload
///   (corrupt audio, unsupported format, model failure; not distinguished)
pub async fn transcribe_handler(
    State(state): State<AppState>,
    multipart: Option<Multipart>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let audio = read_file_field(multipart, "audio")
        .await
        .ok_or_else(|| ApiError::validation("audio", "No audio file provided"))?;

    debug!("transcription request: {} bytes of audio", audio.len());

    let transcriber = state.registry.transcriber().ok_or_else(|| {
        error!("transcription engine not loaded");
        ApiError::processing("Failed to transcribe audio")
    })?;

    // Scoped temp file: the guard deletes it on every exit path, including
    // engine failure below
    let temp_audio = tempfile::Builder::new()
        .prefix("audio-")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| {
            error!("failed to create temp audio file: {}", e);
            ApiError::processing("Failed to transcribe audio")
        })?;

    tokio::fs::write(temp_audio.path(), &audio).await.map_err(|e| {
        error!("failed to write temp audio file: {}", e);
        ApiError::processing("Failed to transcribe audio")
    })?;

    let transcription = transcriber.transcribe(temp_audio.path()).map_err(|e| {
        error!("audio transcription error: {}", e);
        ApiError::processing("Failed to transcribe audio")
    })?;

    debug!("transcribed {} chars", transcription.text.len());

    Ok(Json(TranscribeResponse::new(
        &transcription.text,
        transcription.language,
    )))
}
