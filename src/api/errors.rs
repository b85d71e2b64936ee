// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! API error taxonomy and the failure envelope
//!
//! Two kinds cover the whole surface: the caller sent a bad request
//! (validation, 400) or something failed while processing it (500). The
//! caller sees only the category message; causes stay in the server log.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Request-scoped errors, pattern-matched at the handler boundary
#[derive(Debug, Clone)]
pub enum ApiError {
    /// A required field is missing or malformed; the message names it
    ValidationError { field: String, message: String },
    /// Model invocation or decoding failed; the message is a generic
    /// category, never the underlying cause
    ProcessingError(String),
}

impl ApiError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn processing(message: &str) -> Self {
        Self::ProcessingError(message.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::ProcessingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message exposed to the caller
    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
            Self::ProcessingError(message) => message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError { field, message } => {
                write!(f, "validation error for {}: {}", field, message)
            }
            Self::ProcessingError(message) => write!(f, "processing error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
