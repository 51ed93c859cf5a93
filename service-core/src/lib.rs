//! service-core: Shared infrastructure for the platform HTTP services.
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
