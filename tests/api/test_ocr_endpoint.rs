// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! OCR endpoint tests for POST /image-to-text

use std::sync::Arc;

use axum::http::StatusCode;

use super::common::{
    detection, multipart_body, post_multipart, response_json, router_ready, router_with_engines,
    tiny_png, FailingRecognizer, StubTranscriber,
};

/// Test 1: Missing `image` field returns 400 with the exact message
#[tokio::test]
async fn test_missing_image_field_returns_400() {
    let body = multipart_body("photo", "scan.png", &tiny_png());
    let response = post_multipart(router_ready("", vec![]), "/image-to-text", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "No image file provided");
}

/// Test 2: Detections above the threshold are returned in order with the
/// aggregated text
#[tokio::test]
async fn test_detections_filtered_and_aggregated() {
    let router = router_ready(
        "",
        vec![
            detection("MILK", 0.95),
            detection("smudge", 0.2), // dropped
            detection("2L", 0.82),
        ],
    );

    let body = multipart_body("image", "label.png", &tiny_png());
    let response = post_multipart(router, "/image-to-text", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["full_text"], "MILK 2L");
    assert_eq!(body["total_items"], 2);

    let results = body["detailed_results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["text"], "MILK");
    assert_eq!(results[1]["text"], "2L");
    // Geometry passes through
    assert_eq!(results[0]["bbox"]["width"], 30);
}

/// Test 3: An image with nothing above the threshold yields the empty shape
#[tokio::test]
async fn test_zero_retained_detections() {
    let router = router_ready("", vec![detection("noise", 0.5)]); // at threshold, dropped
    let body = multipart_body("image", "blank.png", &tiny_png());
    let response = post_multipart(router, "/image-to-text", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["full_text"], "");
    assert_eq!(body["total_items"], 0);
    assert!(body["detailed_results"].as_array().unwrap().is_empty());
}

/// Test 4: A payload that is not a decodable image returns 500
#[tokio::test]
async fn test_undecodable_payload_returns_500() {
    let router = router_ready("", vec![]);
    let body = multipart_body("image", "junk.png", b"\x00\x01\x02\x03\x04\x05");
    let response = post_multipart(router, "/image-to-text", body).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Failed to extract text from image");
}

/// Test 5: Engine failure returns 500 with the generic message
#[tokio::test]
async fn test_engine_failure_returns_500() {
    let router = router_with_engines(
        Arc::new(StubTranscriber {
            text: String::new(),
            language: None,
        }),
        Arc::new(FailingRecognizer),
    );

    let body = multipart_body("image", "label.png", &tiny_png());
    let response = post_multipart(router, "/image-to-text", body).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Failed to extract text from image");
}
