// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the percept node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-inference-facade-2025-11-02";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "audio-to-text",
    "image-to-text",
    "text-preprocessing",
    "onnx-cpu-inference",
    "multipart-uploads",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("percept-node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
