// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Health endpoint tests for GET /health
//!
//! The health body reports per-capability availability; before `load()`
//! completes both capabilities must read unavailable, after it both read
//! available.

use axum::http::StatusCode;

use super::common::{get, response_json, router_ready, router_unloaded};

/// Test 1: Before models are loaded, both capabilities are unavailable
#[tokio::test]
async fn test_health_before_load_reports_unavailable() {
    let response = get(router_unloaded(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "percept-node");
    assert_eq!(body["models"]["whisper"], false);
    assert_eq!(body["models"]["ocr"], false);
}

/// Test 2: With both engines present, both capabilities are available
#[tokio::test]
async fn test_health_after_load_reports_available() {
    let response = get(router_ready("", vec![]), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["models"]["whisper"], true);
    assert_eq!(body["models"]["ocr"], true);
}
