// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::sync::Arc;

use anyhow::Result;
use percept_node::api;
use percept_node::config::ServiceConfig;
use percept_node::registry::ModelRegistry;
use percept_node::version;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("starting {}", version::get_version_string());

    let config = ServiceConfig::from_env();
    tracing::info!(
        "config: port={}, asr_model_dir={}, ocr_model_dir={}",
        config.port,
        config.asr_model_dir.display(),
        config.ocr_model_dir.display()
    );

    // Both engines must load before the service accepts traffic; either
    // failure aborts startup
    let registry = ModelRegistry::load(&config).await?;
    tracing::info!("all models loaded, accepting traffic");

    api::start_server(&config, Arc::new(registry))
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    Ok(())
}
