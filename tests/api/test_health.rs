use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use sightline_node::api::health_handler;

fn health_router() -> Router {
    Router::new().route("/notify/v1/health", get(health_handler))
}

#[tokio::test]
async fn test_health_returns_fixed_payload() {
    let app = health_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/notify/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], br#"{"msg":"OK"}"#);
}

#[tokio::test]
async fn test_health_is_idempotent() {
    for _ in 0..3 {
        let response = health_router()
            .oneshot(
                Request::builder()
                    .uri("/notify/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = health_router()
        .oneshot(
            Request::builder()
                .uri("/notify/v1/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
