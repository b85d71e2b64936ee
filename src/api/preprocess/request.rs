// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Preprocessing request types

use serde::Deserialize;

/// Request for text preprocessing
#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessRequest {
    /// The text to normalize
    #[serde(default)]
    pub text: Option<String>,
}
