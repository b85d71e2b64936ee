// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Preprocessing endpoint handler

use axum::extract::Json;
use tracing::debug;

use super::request::PreprocessRequest;
use super::response::PreprocessResponse;
use crate::api::errors::ApiError;
use crate::text::normalize;

/// POST /preprocess-text - Normalize a text payload
///
/// Accepts `{"text": "..."}` and returns the whitespace-collapsed,
/// substituted text plus the list of configured patterns.
///
/// # Errors
/// - 400 Bad Request: body missing, not JSON, or without a string `text`
pub async fn preprocess_handler(
    body: Option<Json<PreprocessRequest>>,
) -> Result<Json<PreprocessResponse>, ApiError> {
    let text = body
        .and_then(|Json(request)| request.text)
        .ok_or_else(|| ApiError::validation("text", "No text provided"))?;

    let normalized = normalize(&text);
    debug!(
        "preprocessed {} chars -> {} chars",
        text.len(),
        normalized.cleaned.len()
    );

    Ok(Json(PreprocessResponse::new(text, normalized)))
}
