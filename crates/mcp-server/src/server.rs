//! Main MCP server orchestration

use bunq_client::BankingApi;
use std::sync::Arc;
use tracing::info;

use crate::transport::{HttpTransport, StdioTransport};

/// Server mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerMode {
    /// stdio transport (for desktop MCP hosts)
    #[default]
    Stdio,
    /// HTTP transport
    Http { port: u16 },
}

/// MCP server exposing the bunq tools
pub struct McpServer {
    api: Arc<dyn BankingApi>,
    mode: ServerMode,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(api: Arc<dyn BankingApi>) -> Self {
        Self {
            api,
            mode: ServerMode::default(),
        }
    }

    /// Set the server mode
    pub fn with_mode(mut self, mode: ServerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the server until the transport closes
    pub async fn run(&self) -> std::io::Result<()> {
        match self.mode {
            ServerMode::Stdio => {
                info!("Starting MCP server in stdio mode");
                StdioTransport::new(self.api.clone()).run().await
            }
            ServerMode::Http { port } => {
                info!("Starting MCP server in HTTP mode on port {}", port);
                HttpTransport::new(self.api.clone(), port).run().await
            }
        }
    }
}
