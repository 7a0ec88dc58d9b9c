// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
pub mod detect;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use detect::{detect_handler, DetectResponse, ImagePayload};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse};
pub use http_server::{cors_layer, router, start_server, AppState};
