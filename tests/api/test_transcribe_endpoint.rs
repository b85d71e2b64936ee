// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Transcription endpoint tests for POST /audio-to-text

use std::sync::Arc;

use axum::http::StatusCode;

use super::common::{
    detection, multipart_body, post_multipart, response_json, router_ready, router_unloaded,
    router_with_engines, FailingTranscriber, StubRecognizer, StubTranscriber,
};

/// Test 1: Missing `audio` field returns 400 with the exact message
#[tokio::test]
async fn test_missing_audio_field_returns_400() {
    // Multipart body present, but the field is named something else
    let body = multipart_body("file", "clip.wav", b"RIFF....");
    let response = post_multipart(router_ready("", vec![]), "/audio-to-text", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "No audio file provided");
}

/// Test 2: Non-multipart request also gets the validation error
#[tokio::test]
async fn test_empty_request_returns_400() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let request = Request::builder()
        .method("POST")
        .uri("/audio-to-text")
        .body(Body::empty())
        .unwrap();
    let response = router_ready("", vec![]).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "No audio file provided");
}

/// Test 3: Successful transcription returns trimmed text with the
/// placeholder confidence
#[tokio::test]
async fn test_successful_transcription() {
    let router = router_ready("  two kg of rice \n", vec![]);
    let body = multipart_body("audio", "order.wav", b"fake-wav-bytes");
    let response = post_multipart(router, "/audio-to-text", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["text"], "two kg of rice");
    assert_eq!(body["language"], "en");
    assert_eq!(body["confidence"], 1.0);
}

/// Test 4: Engine-reported language is passed through
#[tokio::test]
async fn test_engine_language_passthrough() {
    let router = router_with_engines(
        Arc::new(StubTranscriber {
            text: "guten tag".to_string(),
            language: Some("de".to_string()),
        }),
        Arc::new(StubRecognizer { detections: vec![] }),
    );

    let body = multipart_body("audio", "clip.wav", b"fake");
    let response = post_multipart(router, "/audio-to-text", body).await;

    let body = response_json(response).await;
    assert_eq!(body["language"], "de");
}

/// Test 5: Engine failure returns 500 with the generic message
#[tokio::test]
async fn test_engine_failure_returns_500() {
    let router = router_with_engines(
        Arc::new(FailingTranscriber),
        Arc::new(StubRecognizer { detections: vec![] }),
    );

    let body = multipart_body("audio", "broken.wav", b"not really audio");
    let response = post_multipart(router, "/audio-to-text", body).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Failed to transcribe audio");
}

/// Test 6: Missing engine is a processing failure, not a validation one
#[tokio::test]
async fn test_unloaded_engine_returns_500() {
    let body = multipart_body("audio", "clip.wav", b"fake");
    let response = post_multipart(router_unloaded(), "/audio-to-text", body).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Failed to transcribe audio");
}

/// Test 7: A present but empty payload reaches the engine (it is the
/// engine's job to reject it), so a working stub still answers 200
#[tokio::test]
async fn test_empty_payload_is_not_a_validation_error() {
    let router = router_ready("nothing", vec![detection("x", 0.9)]);
    let body = multipart_body("audio", "empty.wav", b"");
    let response = post_multipart(router, "/audio-to-text", body).await;

    assert_eq!(response.status(), StatusCode::OK);
}
