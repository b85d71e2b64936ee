// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR endpoint handler

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, error, warn};

use super::response::ImageTextResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::multipart::read_file_field;
use crate::vision::{decode_image_bytes, filter_detections};

/// POST /image-to-text - Extract text from an uploaded image
///
/// Accepts a multipart form with a single `image` file field. Low-confidence
/// detections are dropped before the response is built.
///
/// # Errors
/// - 400 Bad Request: no `image` field in the request
/// - 500 Internal Server Error: the payload could not be decoded as an
///   image, or the recognition engine failed
pub async fn ocr_handler(
    State(state): State<AppState>,
    multipart: Option<Multipart>,
) -> Result<Json<ImageTextResponse>, ApiError> {
    let payload = read_file_field(multipart, "image")
        .await
        .ok_or_else(|| ApiError::validation("image", "No image file provided"))?;

    let recognizer = state.registry.recognizer().ok_or_else(|| {
        error!("recognition engine not loaded");
        ApiError::processing("Failed to extract text from image")
    })?;

    let (image, info) = decode_image_bytes(&payload).map_err(|e| {
        warn!("failed to decode uploaded image: {}", e);
        ApiError::processing("Failed to extract text from image")
    })?;

    debug!(
        "OCR request: {}x{} {:?}, {} bytes",
        info.width, info.height, info.format, info.size_bytes
    );

    let detections = recognizer.detect(&image).map_err(|e| {
        error!("image OCR error: {}", e);
        ApiError::processing("Failed to extract text from image")
    })?;

    let filtered = filter_detections(detections);
    debug!("retained {} detections", filtered.retained.len());

    Ok(Json(ImageTextResponse::new(filtered)))
}
