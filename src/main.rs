use rmcp::ServiceExt;
use stability_mcp::{Config, StabilityClient, StabilityMcpServer, StabilityToolkit};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the MCP protocol; logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,stability_mcp=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::from_env()?;

    info!(
        rpc_url = %config.rpc_url,
        api_key = %config.api_key.masked(),
        write_wait = config.write_wait,
        "starting stability mcp server"
    );

    let client = StabilityClient::from_config(&config)?;
    let server = StabilityMcpServer::new(StabilityToolkit::new(client));

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| anyhow::anyhow!("failed to initialize server: {}", e))?;

    service
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
