//! Prompt to pull request: generate, then publish.

use crate::services::error::GatewayError;
use crate::services::generator::ManifestGenerator;
use crate::services::metrics::{MetricsRecorder, RequestStatus};
use crate::services::naming;
use crate::services::publisher::{GitOpsPublisher, PublishResult};
use std::sync::Arc;

pub const GENERATE_MANIFEST_ENDPOINT: &str = "generate_manifest";

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub app_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub manifest: String,
    pub app_name: String,
    pub publish: PublishResult,
}

pub struct ManifestPipeline {
    generator: ManifestGenerator,
    publisher: GitOpsPublisher,
    path_prefix: String,
    metrics: Arc<dyn MetricsRecorder>,
}

impl ManifestPipeline {
    pub fn new(
        generator: ManifestGenerator,
        publisher: GitOpsPublisher,
        path_prefix: impl Into<String>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            generator,
            publisher,
            path_prefix: path_prefix.into(),
            metrics,
        }
    }

    /// The source host is only contacted once a manifest exists.
    pub async fn run(&self, request: GenerationRequest) -> Result<GenerationOutcome, GatewayError> {
        self.metrics
            .record_request(GENERATE_MANIFEST_ENDPOINT, RequestStatus::Started);

        let manifest = match self.generator.generate(&request.prompt).await {
            Ok(manifest) => manifest,
            Err(e) => {
                self.metrics
                    .record_request(GENERATE_MANIFEST_ENDPOINT, RequestStatus::InferenceError);
                return Err(e);
            }
        };

        let app_name = naming::resolve_app_name(request.app_name);
        let file_path = naming::manifest_path(&self.path_prefix, &app_name);

        let publish = match self
            .publisher
            .publish(&manifest, &file_path, &app_name, &request.prompt)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                self.metrics
                    .record_request(GENERATE_MANIFEST_ENDPOINT, RequestStatus::SourceHostError);
                return Err(e);
            }
        };

        self.metrics
            .record_request(GENERATE_MANIFEST_ENDPOINT, RequestStatus::Success);

        Ok(GenerationOutcome {
            manifest,
            app_name,
            publish,
        })
    }
}
