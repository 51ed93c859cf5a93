//! ai-gateway: natural language to Kubernetes manifests, delivered as
//! GitOps pull requests.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
