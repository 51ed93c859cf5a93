pub mod error;
pub mod generator;
pub mod metrics;
pub mod naming;
pub mod pipeline;
pub mod providers;
pub mod publisher;
pub mod source_host;

pub use error::{GatewayError, Upstream};
pub use generator::ManifestGenerator;
pub use metrics::{MetricsRecorder, NoopMetrics, PrometheusMetrics};
pub use pipeline::{GenerationOutcome, GenerationRequest, ManifestPipeline};
pub use publisher::{GitOpsPublisher, PublishResult};
