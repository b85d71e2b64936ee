// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server: router, shared state, health endpoint

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::ocr::ocr_handler;
use crate::api::preprocess::preprocess_handler;
use crate::api::transcribe::transcribe_handler;
use crate::config::ServiceConfig;
use crate::registry::{ModelRegistry, ModelStatus};

/// Upload body cap; axum's 2MB default is too small for audio clips
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Service name reported by the health endpoint
const SERVICE_NAME: &str = "percept-node";

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}

/// Response for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub models: ModelStatus,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/audio-to-text", post(transcribe_handler))
        .route("/image-to-text", post(ocr_handler))
        .route("/preprocess-text", post(preprocess_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until the process exits
pub async fn start_server(
    config: &ServiceConfig,
    registry: Arc<ModelRegistry>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(AppState::new(registry));

    let addr = config.listen_addr().parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        models: state.registry.status(),
    })
}
