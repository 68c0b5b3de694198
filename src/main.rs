#![deny(warnings)]
#![deny(clippy::unwrap_used)]

use dotenv::dotenv;
use poem::{EndpointExt, Route, Server, listener::TcpListener, middleware::Tracing};
use poem_mcpserver::{McpServer, streamable_http};
use syslog_fleet::mcp::{self, config::PATH_CONFIG_ENV_VAR};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Initialize logging with proper tracing default
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().expect("valid directive")),
        )
        .init();

    // Setup MCP server
    let mcp_port: u16 = std::env::var("MCP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let mcp_addr = format!("0.0.0.0:{}", mcp_port);
    info!("Starting MCP server on {}", mcp_addr);

    // The document is re-read on every fetch; this only reports problems early
    match mcp::config::config_path_from_env() {
        None => warn!(
            "{} is not set; fetch_logs and list_hosts will fail until it points at a configuration file",
            PATH_CONFIG_ENV_VAR
        ),
        Some(path) => match mcp::credentials::load_credentials(&path) {
            Ok(credentials) => info!(
                "Fetching logs as {} with key {:?}",
                credentials.remote_user, credentials.private_key_path
            ),
            Err(e) => warn!("Configuration check failed: {}", e),
        },
    }

    let app = Route::new()
        .at(
            "/",
            streamable_http::endpoint(|_| McpServer::new().tools(mcp::McpLogCommands {})),
        )
        .with(Tracing);

    info!("Syslog fleet MCP server is ready");
    info!("Use list_hosts to see the inventory and fetch_logs to read syslog tails");

    Server::new(TcpListener::bind(mcp_addr))
        .name("Syslog Fleet MCP Server")
        .run(app)
        .await?;

    Ok(())
}
