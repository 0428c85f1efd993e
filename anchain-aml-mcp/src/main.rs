use std::sync::Arc;

use anchain_aml_mcp::{Cli, Config, McpServer};
use anchain_aml_providers::HttpTransport;
use anchain_aml_tools::{AmlToolAdapter, ToolDispatcher, ToolRegistry};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the MCP stream, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_cli(cli)?;

    tracing::info!(
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        "Configuration loaded"
    );

    let transport = Arc::new(HttpTransport::new(config.base_url.clone()));
    let adapter = AmlToolAdapter::new(config.api_key.clone(), transport).with_timeout(config.timeout);
    let registry = Arc::new(ToolRegistry::with_screening_tools(adapter));
    let server = Arc::new(McpServer::new(ToolDispatcher::new(registry)));

    server.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
    Ok(())
}
