// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR endpoint
//!
//! Provides POST /image-to-text for extracting text from uploaded images.

pub mod handler;
pub mod response;

pub use handler::ocr_handler;
pub use response::ImageTextResponse;
