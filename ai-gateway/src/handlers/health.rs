use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

/// Liveness plus the inference settings in use.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "ai-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "ollama": state.config.inference.url,
        "model": state.config.inference.model,
    }))
}
