//! bunq MCP server - exposes a bunq account to MCP clients
//!
//! The server opens a bunq API context at startup (installation, device and
//! session registration) and then serves MCP over stdio or HTTP. Credentials
//! come from flags, the environment, or a `.env` file in the working directory.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use bunq_client::config::{API_KEY_VAR, API_URL_VAR, ENVIRONMENT_VAR};
use bunq_client::{BunqClient, BunqConfig};
use mcp_server::{McpServer, ServerMode};

/// bunq MCP server - banking tools for MCP clients
#[derive(Parser, Debug)]
#[command(name = "bunq-mcp-server")]
#[command(version)]
#[command(about = "Exposes bunq banking operations as MCP tools")]
struct Args {
    /// Run in stdio mode (for MCP clients like Claude Desktop)
    #[arg(long)]
    stdio: bool,

    /// Run in HTTP mode on --port
    #[arg(long, conflicts_with = "stdio")]
    http: bool,

    /// Port for HTTP server
    #[arg(long, default_value = "3000")]
    port: u16,

    /// bunq API key
    #[arg(long, env = "BUNQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// PRODUCTION selects the live API; anything else uses the sandbox
    #[arg(long, env = "BUNQ_ENVIRONMENT")]
    environment: Option<String>,

    /// Override the bunq API base URL
    #[arg(long, env = "BUNQ_API_URL")]
    api_url: Option<String>,
}

impl Args {
    fn mode(&self) -> ServerMode {
        if self.http {
            ServerMode::Http { port: self.port }
        } else {
            ServerMode::Stdio
        }
    }

    /// Flags win over the process environment
    fn config(&self) -> bunq_client::Result<BunqConfig> {
        BunqConfig::from_lookup(|name| {
            let flag = match name {
                API_KEY_VAR => self.api_key.clone(),
                ENVIRONMENT_VAR => self.environment.clone(),
                API_URL_VAR => self.api_url.clone(),
                _ => None,
            };
            flag.or_else(|| std::env::var(name).ok())
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads env-backed flags
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // stdout carries the protocol in stdio mode, so logs always go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = args.config().context("Invalid bunq configuration")?;
    info!("Using bunq {} environment", config.environment);

    let client = BunqClient::connect(&config)
        .await
        .context("Failed to create bunq API context")?;

    let mode = args.mode();
    if let ServerMode::Http { port } = mode {
        info!("Starting MCP server on http://localhost:{}", port);
    }

    McpServer::new(Arc::new(client))
        .with_mode(mode)
        .run()
        .await
        .context("MCP server stopped with an error")?;

    Ok(())
}
