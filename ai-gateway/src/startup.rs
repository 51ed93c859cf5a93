//! Application startup and lifecycle management.

use crate::config::GatewayConfig;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::providers::OllamaClient;
use crate::services::source_host::GitHubClient;
use crate::services::{
    GitOpsPublisher, ManifestGenerator, ManifestPipeline, MetricsRecorder, PrometheusMetrics,
};
use anyhow::Context;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::lifecycle::shutdown_signal;
use service_core::middleware::{http_trace_layer, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub pipeline: Arc<ManifestPipeline>,
    pub metrics: Arc<dyn MetricsRecorder>,
}

impl AppState {
    /// Wire the production clients described by `config`.
    pub fn from_config(config: GatewayConfig) -> anyhow::Result<Self> {
        let metrics: Arc<dyn MetricsRecorder> =
            Arc::new(PrometheusMetrics::new().context("Failed to register metrics")?);

        let inference = Arc::new(
            OllamaClient::new(&config.inference).context("Failed to build inference client")?,
        );
        tracing::info!(
            endpoint = %config.inference.url,
            model = %config.inference.model,
            "Initialized Ollama inference client"
        );

        let source_host =
            Arc::new(GitHubClient::new(&config.github).context("Failed to build GitHub client")?);
        tracing::info!(
            repo = %config.github.repo,
            base_branch = %config.github.base_branch,
            "Initialized GitHub client"
        );

        let generator = ManifestGenerator::new(inference, metrics.clone());
        let publisher = GitOpsPublisher::new(
            source_host,
            config.github.base_branch.clone(),
            config.inference.model.clone(),
            metrics.clone(),
        );
        let pipeline = ManifestPipeline::new(
            generator,
            publisher,
            config.manifests.path_prefix.clone(),
            metrics.clone(),
        );

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
            metrics,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/generate/manifest", post(handlers::generate_manifest))
        .layer(from_fn_with_state(
            state.metrics.clone(),
            http_metrics_middleware,
        ))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Port 0 binds a random port, which tests rely on.
    pub async fn build(config: GatewayConfig) -> anyhow::Result<Self> {
        let address = config.common.address();
        let state = AppState::from_config(config)?;

        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("ai-gateway listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("Server error: {}", e);
                anyhow::anyhow!("Server error: {}", e)
            })
    }
}
