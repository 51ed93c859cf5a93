//! Inference backend abstraction.
//!
//! The generator only needs "prompt in, text out"; the backend hides the
//! wire format behind [`InferenceClient`].

pub mod ollama;

use crate::services::error::GatewayError;
use async_trait::async_trait;

pub use ollama::OllamaClient;

/// Sampling parameters sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
}

/// A single non-streaming completion.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub prompt: String,
    pub system: String,
    pub options: SamplingOptions,
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Return the raw completion text, untouched.
    async fn complete(&self, request: &InferenceRequest) -> Result<String, GatewayError>;

    /// Model identifier the backend runs.
    fn model(&self) -> &str;
}
