use service_core::config::{get_optional_env, Config};
use service_core::lifecycle::shutdown_signal;
use service_core::observability::init_tracing;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let otlp_endpoint = get_optional_env("OTLP_ENDPOINT");
    init_tracing("hello-platform", "info", otlp_endpoint.as_deref());

    let address = config.address();
    let listener = TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;
    tracing::info!("hello-platform listening on {}", listener.local_addr()?);

    axum::serve(listener, hello_platform::build_router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("hello-platform stopped");
    Ok(())
}
