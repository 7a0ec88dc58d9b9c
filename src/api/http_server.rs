// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::detect::detect_handler;
use super::handlers::health_handler;
use crate::vision::Detector;

/// Shared state injected into every handler. The detector is loaded once
/// at startup and read-only thereafter.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<Detector>,
}

/// Wide-open CORS policy: a single wildcard for origins, methods and
/// headers. Credentials are deliberately not advertised; a wildcard origin
/// with credentials is rejected by browsers and by tower-http.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router with all routes and middleware wired.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/notify/v1/health", get(health_handler))
        // Detection endpoint
        .route("/object-to-img", post(detect_handler))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until shutdown.
pub async fn start_server(
    addr: SocketAddr,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
