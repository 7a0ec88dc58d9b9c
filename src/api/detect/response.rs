// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Detection endpoint response types
//!
//! Field names (`result`, `img`, `image`) are part of the wire contract
//! consumed by existing clients. The whole payload is served as
//! `application/json`.

use serde::{Deserialize, Serialize};

/// Nested envelope carrying the annotated visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Base64-encoded PNG bytes of the rendered visualization
    pub image: String,
}

/// Response from the detection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    /// Unique detected labels (duplicates removed, order not guaranteed)
    pub result: Vec<String>,
    /// Annotated image envelope
    pub img: ImagePayload,
}

impl DetectResponse {
    pub fn new(result: Vec<String>, image: String) -> Self {
        Self {
            result,
            img: ImagePayload { image },
        }
    }
}
