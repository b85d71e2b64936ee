// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Preprocessing endpoint tests for POST /preprocess-text
//!
//! The substitution table is literal and ordered; these tests pin its exact
//! output, including the substring artifacts short patterns produce.

use axum::http::StatusCode;

use super::common::{post_json, response_json, router_ready};

/// Test 1: The documented example, artifacts included: "a" fires inside
/// "grams" before the unit rule can
#[tokio::test]
async fn test_number_and_unit_substitution() {
    let response = post_json(
        router_ready("", vec![]),
        "/preprocess-text",
        r#"{"text": "two grams of rice"}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["original_text"], "two grams of rice");
    assert_eq!(body["cleaned_text"], "2 gr1ms of rice");
}

/// Test 2: Whitespace runs collapse before substitution
#[tokio::test]
async fn test_whitespace_collapse() {
    let response = post_json(
        router_ready("", vec![]),
        "/preprocess-text",
        "{\"text\": \"  ten \\n liters \"}",
    )
    .await;

    let body = response_json(response).await;
    assert_eq!(body["cleaned_text"], "10 ltrs");
}

/// Test 3: The audit list is the full configured table in order
#[tokio::test]
async fn test_preprocessing_applied_lists_patterns() {
    let response = post_json(
        router_ready("", vec![]),
        "/preprocess-text",
        r#"{"text": "plain"}"#,
    )
    .await;

    let body = response_json(response).await;
    let applied = body["preprocessing_applied"].as_array().unwrap();
    assert_eq!(applied[0], "two");
    assert!(applied.iter().any(|p| p == "half dozen"));
    assert!(applied.len() > 20);
}

/// Test 4: Missing `text` field returns 400 with the exact message
#[tokio::test]
async fn test_missing_text_returns_400() {
    let response = post_json(router_ready("", vec![]), "/preprocess-text", "{}").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "No text provided");
}

/// Test 5: A body that is not JSON gets the same validation error
#[tokio::test]
async fn test_malformed_body_returns_400() {
    let response = post_json(router_ready("", vec![]), "/preprocess-text", "not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "No text provided");
}

/// Test 6: Empty string is valid input and normalizes to empty
#[tokio::test]
async fn test_empty_string_is_valid() {
    let response = post_json(
        router_ready("", vec![]),
        "/preprocess-text",
        r#"{"text": ""}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["cleaned_text"], "");
}
