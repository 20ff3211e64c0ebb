// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use scenescribe::{
    analysis::ImageAnalyzer,
    api::{create_app, start_server, AppState},
    config::ServiceConfig,
    generation::CompletionClient,
    vision::VisionModelManager,
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::parse();
    config.validate().context("Invalid configuration")?;

    tracing::info!("🚀 Starting scenescribe v{}", env!("CARGO_PKG_VERSION"));

    let vision_config = config.vision_config();
    let models = tokio::task::spawn_blocking(move || VisionModelManager::load(&vision_config))
        .await
        .context("Model loading task panicked")??;

    for model in models.list_models() {
        tracing::info!("   {} ({}) on {}", model.name, model.model_type, model.device);
    }

    let generator = CompletionClient::new(config.completion_config())
        .context("Failed to build completion client")?;

    let analyzer = ImageAnalyzer::new(
        models.detector(),
        models.scene_classifier(),
        Arc::new(generator),
    );

    let app = create_app(AppState::new(analyzer), &config.cors_origins())?;
    start_server(&config.bind_addr(), app).await
}
