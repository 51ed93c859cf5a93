//! Ollama inference client (`POST /api/generate`, non-streaming).

use super::{InferenceClient, InferenceRequest, SamplingOptions};
use crate::config::InferenceConfig;
use crate::services::error::{GatewayError, Upstream};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
}

impl From<SamplingOptions> for GenerateOptions {
    fn from(options: SamplingOptions) -> Self {
        Self {
            temperature: options.temperature,
            top_p: options.top_p,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: config.timeout,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/api/{}", self.base_url, method)
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn complete(&self, request: &InferenceRequest) -> Result<String, GatewayError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: &request.system,
            stream: false,
            options: request.options.into(),
        };

        tracing::debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            "Sending request to Ollama"
        );

        let response = self
            .client
            .post(self.api_url("generate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(Upstream::Inference, self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            // A model that cannot be found is still an outage from the caller's view.
            return Err(GatewayError::UpstreamUnavailable {
                upstream: Upstream::Inference,
                message: format!("status {}: {}", status, error_text),
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::UpstreamTimeout {
                    upstream: Upstream::Inference,
                    timeout: self.timeout,
                }
            } else {
                GatewayError::malformed(Upstream::Inference, e)
            }
        })?;

        Ok(parsed.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
