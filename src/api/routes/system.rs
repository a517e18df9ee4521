//! Front-end page, health check, and OpenAPI handlers.

use axum::{Json, response::Html};
use serde_json::json;
use utoipa::OpenApi;

/// GET / - Serve the static front-end page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../../assets/index.html"))
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /openapi.json - OpenAPI specification
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(crate::api::ApiDoc::openapi())
}
