//! Minimal service that proves a deployment pipeline end to end.

use axum::middleware::from_fn;
use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use service_core::middleware::{http_trace_layer, request_id_middleware};

pub const GREETING: &str = "Hello from the Internal Developer Platform!";

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": GREETING,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub fn build_router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
}
