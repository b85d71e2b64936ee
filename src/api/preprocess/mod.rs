// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text preprocessing endpoint
//!
//! Provides POST /preprocess-text for normalizing recognized text.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::preprocess_handler;
pub use request::PreprocessRequest;
pub use response::PreprocessResponse;
