use std::sync::Arc;

use rmcp::transport::sse_server::SseServer;
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::manager::DevDocsManager;
use crate::mcp::DevDocsServer;

/// Logs go to stderr; stdout carries the stdio transport.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    let result = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {e}");
    }
}

// start sse server
pub async fn start_sse_server(addr: &str, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);
    let manager = Arc::new(DevDocsManager::from_config(&config));

    tracing::info!(base_url = %config.base_url, "Starting DevDocs SSE server on {}", addr);
    let ct = SseServer::serve(addr.parse()?)
        .await?
        .with_service(move || DevDocsServer::new(manager.clone()));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received ctrl-c, shutting down");
    ct.cancel();
    Ok(())
}

// start stdio server
pub async fn start_stdio_server(config: Config) -> anyhow::Result<()> {
    init_tracing(&config);
    let manager = Arc::new(DevDocsManager::from_config(&config));

    tracing::info!(base_url = %config.base_url, "Starting DevDocs MCP server");

    let service = DevDocsServer::new(manager)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
