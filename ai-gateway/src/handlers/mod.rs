//! HTTP handlers for ai-gateway.

pub mod health;
pub mod manifest;
pub mod metrics;

pub use health::health_check;
pub use manifest::generate_manifest;
pub use metrics::metrics;
