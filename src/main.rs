use askme_gateway::{GatewayConfig, HttpBackend, ToolGateway, telemetry, transport};
use std::sync::Arc;
use tokio::io::{BufReader, stdin, stdout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let config = GatewayConfig::from_env()?;
    telemetry::init_tracing(config.log_format);

    let backend = HttpBackend::new(&config)?;
    tracing::info!(backend_url = %backend.base_url(), "askme backend configured");

    let gateway = ToolGateway::standard(Arc::new(backend), &config);
    tracing::info!(tools = ?gateway.tool_names(), "serving tools on stdio");

    transport::serve(&gateway, BufReader::new(stdin()), stdout()).await?;
    Ok(())
}
