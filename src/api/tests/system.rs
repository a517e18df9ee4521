//! Tests for the front-end page, health, and OpenAPI endpoints

use super::*;
use axum::http::StatusCode;

#[tokio::test]
async fn index_serves_the_front_end_page() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<form id=\"download-form\""));
    assert!(html.contains("/get_info"));
}

#[tokio::test]
async fn health_reports_ok_and_version() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/download"].is_object());
    assert!(body["paths"]["/get_info"].is_object());
}

#[tokio::test]
async fn cors_headers_present_when_enabled() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
