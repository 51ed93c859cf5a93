//! Manifest generation: prompt in, YAML text out.
//!
//! The output is passed through untouched apart from trimming. Nothing here
//! parses or validates the YAML.

use crate::services::error::GatewayError;
use crate::services::metrics::MetricsRecorder;
use crate::services::providers::{InferenceClient, InferenceRequest, SamplingOptions};
use std::sync::Arc;
use std::time::Instant;

/// Instructions prepended to every manifest prompt.
pub const K8S_SYSTEM_PROMPT: &str = "You are a Kubernetes manifest generator for a homelab platform.
Generate ONLY valid Kubernetes YAML manifests based on the user's request.
Always include these elements:
- Namespace: ai-generated
- Proper labels: app.kubernetes.io/name, app.kubernetes.io/managed-by: ai-gateway
- Resource requests and limits (use small values for homelab: 100m CPU, 128Mi memory)
- For Deployments: always include a Service as well
Output ONLY the YAML, no explanation, no markdown code blocks, no extra text.
Separate multiple resources with ---
";

/// Low temperature keeps manifests close to deterministic.
pub const MANIFEST_SAMPLING: SamplingOptions = SamplingOptions {
    temperature: 0.1,
    top_p: 0.9,
};

pub struct ManifestGenerator {
    client: Arc<dyn InferenceClient>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl ManifestGenerator {
    pub fn new(client: Arc<dyn InferenceClient>, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { client, metrics }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    #[tracing::instrument(skip_all, fields(model = %self.client.model()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = InferenceRequest {
            prompt: prompt.to_string(),
            system: K8S_SYSTEM_PROMPT.to_string(),
            options: MANIFEST_SAMPLING,
        };

        let start = Instant::now();
        let raw = self.client.complete(&request).await.map_err(|e| {
            tracing::error!(error = %e, "Manifest generation failed");
            e
        })?;
        let elapsed = start.elapsed();

        self.metrics
            .record_generation("manifest", elapsed.as_secs_f64());

        let manifest = raw.trim().to_string();
        tracing::info!(
            elapsed_ms = elapsed.as_millis() as u64,
            manifest_len = manifest.len(),
            "Manifest generated"
        );

        Ok(manifest)
    }
}
