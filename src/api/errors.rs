// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vision::ImageError;

/// JSON body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Malformed request (missing multipart field, bad form data)
    InvalidRequest(String),
    /// Upload could not be decoded as an image
    InvalidImage(String),
    /// Model inference failed; the request is isolated, the process lives on
    InferenceFailed(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone()),
            ApiError::InvalidImage(msg) => ("invalid_image", msg.clone()),
            ApiError::InferenceFailed(msg) => ("inference_failed", msg.clone()),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::InvalidImage(_) => 400,
            ApiError::InferenceFailed(_) => 500,
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::InvalidImage(err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::InvalidImage(msg) => write!(f, "Invalid image: {}", msg),
            ApiError::InferenceFailed(msg) => write!(f, "Inference failed: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, axum::response::Json(self.to_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidRequest("x".into()).status_code(), 400);
        assert_eq!(ApiError::InvalidImage("x".into()).status_code(), 400);
        assert_eq!(ApiError::InferenceFailed("x".into()).status_code(), 500);
    }

    #[test]
    fn test_error_response_payload() {
        let response = ApiError::InvalidImage("bad bytes".into()).to_response();
        assert_eq!(response.error_type, "invalid_image");
        assert_eq!(response.message, "bad bytes");

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error_type\":\"invalid_image\""));
    }

    #[test]
    fn test_from_image_error() {
        let err: ApiError = ImageError::EmptyData.into();
        assert!(matches!(err, ApiError::InvalidImage(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_display() {
        let err = ApiError::InferenceFailed("shape mismatch".into());
        assert_eq!(format!("{}", err), "Inference failed: shape mismatch");
    }
}
