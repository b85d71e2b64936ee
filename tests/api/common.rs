// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared helpers for endpoint tests: stub engines, router setup,
//! multipart body building

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use image::DynamicImage;
use serde_json::Value;
use tower::ServiceExt;

use percept_node::api::{build_router, AppState};
use percept_node::registry::ModelRegistry;
use percept_node::speech::{SpeechError, Transcriber, Transcription};
use percept_node::vision::{BoundingBox, Detection, TextRecognizer};

pub const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Transcriber stub returning fixed text
pub struct StubTranscriber {
    pub text: String,
    pub language: Option<String>,
}

impl Transcriber for StubTranscriber {
    fn transcribe(&self, _audio: &Path) -> Result<Transcription, SpeechError> {
        Ok(Transcription {
            text: self.text.clone(),
            language: self.language.clone(),
        })
    }
}

/// Transcriber stub that always fails, as with corrupt audio
pub struct FailingTranscriber;

impl Transcriber for FailingTranscriber {
    fn transcribe(&self, _audio: &Path) -> Result<Transcription, SpeechError> {
        Err(SpeechError::AudioDecode("stub: corrupt audio".into()))
    }
}

/// Recognizer stub returning fixed detections
pub struct StubRecognizer {
    pub detections: Vec<Detection>,
}

impl TextRecognizer for StubRecognizer {
    fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }
}

/// Recognizer stub that always fails
pub struct FailingRecognizer;

impl TextRecognizer for FailingRecognizer {
    fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        anyhow::bail!("stub: model failure")
    }
}

pub fn detection(text: &str, confidence: f32) -> Detection {
    Detection {
        text: text.to_string(),
        confidence,
        bbox: BoundingBox {
            x: 1,
            y: 2,
            width: 30,
            height: 12,
        },
    }
}

/// Router over a registry built from the given engines
pub fn router_with_engines(
    transcriber: Arc<dyn Transcriber>,
    recognizer: Arc<dyn TextRecognizer>,
) -> Router {
    let registry = ModelRegistry::with_engines(transcriber, recognizer);
    build_router(AppState::new(Arc::new(registry)))
}

/// Router over an unloaded registry (no engines present)
pub fn router_unloaded() -> Router {
    build_router(AppState::new(Arc::new(ModelRegistry::unloaded())))
}

/// Router with working stub engines and the given fixtures
pub fn router_ready(transcript: &str, detections: Vec<Detection>) -> Router {
    router_with_engines(
        Arc::new(StubTranscriber {
            text: transcript.to_string(),
            language: None,
        }),
        Arc::new(StubRecognizer { detections }),
    )
}

/// Build a multipart/form-data body with a single file field
pub fn multipart_body(field_name: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart body to the router and return the response
pub async fn post_multipart(router: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    router.oneshot(request).await.unwrap()
}

/// POST a JSON body to the router and return the response
pub async fn post_json(router: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    router.oneshot(request).await.unwrap()
}

/// GET a path on the router and return the response
pub async fn get(router: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    router.oneshot(request).await.unwrap()
}

/// Read a response body as JSON
pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A 1x1 PNG for image upload tests
pub fn tiny_png() -> Vec<u8> {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";
    STANDARD.decode(TINY_PNG_BASE64).unwrap()
}
