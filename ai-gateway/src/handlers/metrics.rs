use crate::startup::AppState;
use axum::{extract::State, http::header, response::IntoResponse};

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.gather(),
    )
}
