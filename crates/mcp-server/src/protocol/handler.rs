//! MCP request handler

use bunq_client::BankingApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::capabilities::ServerCapabilities;
use super::types::*;
use crate::tools::{ToolExecutor, ToolRegistry};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "bunq";

/// Handler for MCP requests
pub struct RequestHandler {
    /// Tool definitions
    registry: ToolRegistry,
    /// Tool executor
    executor: ToolExecutor,
    server_name: String,
    server_version: String,
}

impl RequestHandler {
    /// Create a new request handler
    pub fn new(api: Arc<dyn BankingApi>) -> Self {
        Self {
            registry: ToolRegistry::new(),
            executor: ToolExecutor::new(api),
            server_name: SERVER_NAME.to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Handle an incoming message; notifications and stray responses yield `None`
    pub async fn handle(&self, message: McpMessage) -> Option<McpMessage> {
        match (message.method, message.id) {
            (Some(method), Some(id)) => {
                debug!("Handling request: {}", method);

                let result = match method.as_str() {
                    "initialize" => self.handle_initialize(message.params),
                    "ping" => Ok(serde_json::json!({})),
                    "tools/list" => self.handle_tools_list(),
                    "tools/call" => self.handle_tools_call(message.params).await,
                    _ => Err(McpError::method_not_found()),
                };

                Some(match result {
                    Ok(result) => McpMessage::response(id, result),
                    Err(error) => McpMessage::error_response(Some(id), error),
                })
            }
            (Some(method), None) => {
                match method.as_str() {
                    "notifications/initialized" | "initialized" => info!("Client initialized"),
                    "notifications/cancelled" => debug!("Request cancelled"),
                    _ => debug!("Unknown notification: {}", method),
                }
                None
            }
            (None, _) => {
                debug!("Received unexpected response");
                None
            }
        }
    }

    fn handle_initialize(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: InitializeParams = parse_params(params)?;

        match &params.client_info {
            Some(client) => info!(
                "Initializing session with client: {} v{} (protocol {})",
                client.name, client.version, params.protocol_version
            ),
            None => info!(
                "Initializing session with unnamed client (protocol {})",
                params.protocol_version
            ),
        }

        to_value(InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities::with_tools(),
            server_info: ServerInfo {
                name: self.server_name.clone(),
                version: self.server_version.clone(),
            },
        })
    }

    fn handle_tools_list(&self) -> Result<Value, McpError> {
        to_value(ToolsListResult {
            tools: self.registry.definitions().to_vec(),
        })
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: ToolCallParams = parse_params(params)?;

        debug!("Calling tool: {}", params.name);

        let result = match self.executor.execute(&params.name, params.arguments).await {
            Ok(result) => result,
            Err(e) => {
                error!("Tool {} failed: {}", params.name, e);
                ToolCallResult::error(e.to_string())
            }
        };

        to_value(result)
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, McpError> {
    let params = params.ok_or_else(|| McpError::invalid_params("Missing params"))?;
    serde_json::from_value(params).map_err(|e| McpError::invalid_params(e.to_string()))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::internal_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::mock::MockBankingApi;
    use serde_json::json;

    fn handler() -> (RequestHandler, Arc<MockBankingApi>) {
        let api = Arc::new(MockBankingApi::new());
        (RequestHandler::new(api.clone()), api)
    }

    async fn call(handler: &RequestHandler, method: &str, params: Option<Value>) -> McpMessage {
        handler
            .handle(McpMessage::request(1, method, params))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let (handler, _) = handler();
        let response = call(
            &handler,
            "initialize",
            Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "1.0"}
            })),
        )
        .await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["serverInfo"]["name"], "bunq");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_initialize_without_params() {
        let (handler, _) = handler();
        let response = call(&handler, "initialize", None).await;

        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let (handler, _) = handler();
        let response = call(&handler, "tools/list", None).await;

        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 12);
        assert!(tools.iter().any(|t| t["name"] == "generate_bunq_me_link"));
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let (handler, _) = handler();
        let response = call(
            &handler,
            "tools/call",
            Some(json!({"name": "get_user_display_name", "arguments": {}})),
        )
        .await;

        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "Jane Doe");
        assert!(result.get("isError").is_none());
    }

    #[tokio::test]
    async fn test_tool_failure_becomes_error_result() {
        let (handler, api) = handler();
        let response = call(
            &handler,
            "tools/call",
            Some(json!({"name": "get_subscription_contracts"})),
        )
        .await;

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "bunq API error (403): Insufficient authorisation."
        );
        assert_eq!(api.calls(), vec!["list_subscription_contracts"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let (handler, _) = handler();
        let response = call(&handler, "tools/call", Some(json!({"name": "nope"}))).await;

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (handler, _) = handler();
        let response = call(&handler, "resources/list", None).await;

        assert_eq!(response.id, Some(json!(1)));
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_notifications_have_no_response() {
        let (handler, _) = handler();
        let message: McpMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .unwrap();

        assert!(handler.handle(message).await.is_none());
    }
}
