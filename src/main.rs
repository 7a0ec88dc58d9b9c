// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
use anyhow::{Context, Result};
use sightline_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    vision::Detector,
};
use std::{env, net::SocketAddr, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = NodeConfig::from_env();
    tracing::info!(
        "Starting sightline-node (port {}, weights {})",
        config.api_port,
        config.model_path.display()
    );

    // Load the model before binding the listener; no handle, no server.
    let detector = Detector::load(&config.model_path)
        .context("Detector startup failed")?
        .with_confidence_threshold(config.confidence_threshold);

    let state = AppState {
        detector: Arc::new(detector),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    start_server(addr, state)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
