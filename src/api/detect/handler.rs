// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Detection endpoint handler

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, info, warn};

use super::response::DetectResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::{decode_to_normalized, render_annotated, unique_labels};

/// Multipart field carrying the uploaded image bytes.
const FILE_FIELD: &str = "file";

/// POST /object-to-img - Detect objects in an uploaded image
///
/// Accepts one multipart `file` field of raw image bytes and runs the
/// decode -> infer -> encode pipeline.
///
/// # Response
/// - `result`: Unique detected labels (possibly empty)
/// - `img.image`: Base64-encoded PNG of the annotated visualization
///
/// # Errors
/// - 400 Bad Request: missing `file` field or undecodable image bytes
/// - 500 Internal Server Error: inference failed (logged, process lives on)
pub async fn detect_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DetectResponse>, ApiError> {
    // 1. Pull the file field out of the multipart form
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some(FILE_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {}", e)))?;
            file_bytes = Some(data);
            break;
        }
    }

    let file_bytes = file_bytes
        .ok_or_else(|| ApiError::InvalidRequest(format!("No '{}' field in request", FILE_FIELD)))?;

    // 2. Decode and normalize; bad bytes are a client error, not a crash
    let (image, image_info) = decode_to_normalized(&file_bytes).map_err(|e| {
        warn!("Failed to decode upload: {}", e);
        ApiError::from(e)
    })?;

    debug!(
        "Decoded upload: {}x{} {:?}, {} bytes",
        image_info.width, image_info.height, image_info.format, image_info.size_bytes
    );

    // 3. Run inference
    let detections = state.detector.detect(&image).map_err(|e| {
        warn!("Inference failed: {:#}", e);
        ApiError::InferenceFailed(e.to_string())
    })?;

    // 4. Build the response payload
    let labels = unique_labels(&detections);
    let encoded = render_annotated(&image, &detections)
        .map_err(|e| ApiError::InferenceFailed(e.to_string()))?;

    info!(
        "Detection complete: {} detections, {} unique labels",
        detections.len(),
        labels.len()
    );

    Ok(Json(DetectResponse::new(labels, encoded)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_field_name() {
        // Wire contract with existing clients
        assert_eq!(FILE_FIELD, "file");
    }

    #[test]
    fn test_handler_exists() {
        let _ = detect_handler;
    }
}
