use crate::dtos::{GenerateManifestRequest, GenerateManifestResponse};
use crate::services::GenerationRequest;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

/// Generate a manifest from a prompt and open a pull request with it.
#[tracing::instrument(skip_all, fields(app_name = ?request.app_name))]
pub async fn generate_manifest(
    State(state): State<AppState>,
    Json(request): Json<GenerateManifestRequest>,
) -> Result<Json<GenerateManifestResponse>, AppError> {
    request.validate()?;

    tracing::info!(prompt_len = request.prompt.len(), "Manifest generation requested");

    let outcome = state
        .pipeline
        .run(GenerationRequest {
            prompt: request.prompt,
            app_name: request.app_name,
        })
        .await?;

    tracing::info!(
        app_name = %outcome.app_name,
        branch = %outcome.publish.branch_name,
        pr_url = %outcome.publish.pr_url,
        "Manifest published"
    );

    Ok(Json(outcome.into()))
}
