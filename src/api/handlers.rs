// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
use axum::response::Json;
use serde::{Deserialize, Serialize};

/// Fixed acknowledgment payload for the health check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub msg: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            msg: "OK".to_string(),
        }
    }
}

/// GET /notify/v1/health - liveness probe
///
/// No side effects; always succeeds while the process is alive, regardless
/// of model state (the process only exists if the model loaded).
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
