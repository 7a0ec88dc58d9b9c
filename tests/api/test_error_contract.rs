use axum::http::StatusCode;
use axum::response::IntoResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;

use sightline_node::api::{ApiError, DetectResponse, ErrorResponse};

#[tokio::test]
async fn test_invalid_image_maps_to_400() {
    let response = ApiError::InvalidImage("Unsupported image format".into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.error_type, "invalid_image");
    assert_eq!(parsed.message, "Unsupported image format");
}

#[tokio::test]
async fn test_inference_failure_maps_to_500() {
    let response = ApiError::InferenceFailed("shape mismatch".into()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_missing_file_field_maps_to_400() {
    let response = ApiError::InvalidRequest("No 'file' field in request".into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_detect_response_wire_contract() {
    // Clients depend on exactly these field names and nesting
    let response = DetectResponse::new(
        vec!["face".to_string()],
        STANDARD.encode([0x89, 0x50, 0x4E, 0x47]),
    );

    let json: Value = serde_json::to_value(&response).unwrap();
    assert!(json["result"].is_array());
    assert_eq!(json["result"][0], "face");

    let encoded = json["img"]["image"].as_str().unwrap();
    let bytes = STANDARD.decode(encoded).unwrap();
    assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
}

#[test]
fn test_result_list_has_no_duplicates() {
    use sightline_node::vision::{unique_labels, BBox, Detection};

    let detection = |label: &str, offset: f32| Detection {
        label: label.to_string(),
        confidence: 0.9,
        bbox: BBox {
            x1: offset,
            y1: offset,
            x2: offset + 10.0,
            y2: offset + 10.0,
        },
    };

    let dets = vec![
        detection("face", 0.0),
        detection("face", 100.0),
        detection("face", 200.0),
    ];

    let labels = unique_labels(&dets);
    assert_eq!(labels, vec!["face"]);
}
