use ai_gateway::config::GatewayConfig;
use ai_gateway::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("ai-gateway", "info", config.otlp_endpoint.as_deref());

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("ai-gateway stopped");
    Ok(())
}
