//! HTTP transport for MCP

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bunq_client::BankingApi;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::protocol::{McpMessage, RequestHandler};

/// HTTP transport for MCP protocol
pub struct HttpTransport {
    api: Arc<dyn BankingApi>,
    port: u16,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(api: Arc<dyn BankingApi>, port: u16) -> Self {
        Self { api, port }
    }

    /// Routes served by this transport
    pub fn router(&self) -> Router {
        let state = Arc::new(RequestHandler::new(self.api.clone()));

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(health))
            .route("/health", get(health))
            .route("/mcp", post(handle_mcp_request))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(state)
    }

    /// Run the HTTP server
    pub async fn run(&self) -> std::io::Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        info!("Starting MCP HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, self.router()).await
    }
}

async fn health() -> &'static str {
    "OK"
}

/// Handle one JSON-RPC message; notifications are acknowledged with 202
async fn handle_mcp_request(
    State(handler): State<Arc<RequestHandler>>,
    Json(message): Json<McpMessage>,
) -> Response {
    debug!("HTTP request: {:?}", message.method);

    match handler.handle(message).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
