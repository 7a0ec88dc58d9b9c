// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
pub mod api;
pub mod config;
pub mod vision;

// Re-export main types
pub use api::{ApiError, AppState, DetectResponse, ErrorResponse, HealthResponse};
pub use config::NodeConfig;
pub use vision::{BBox, Detection, Detector};
