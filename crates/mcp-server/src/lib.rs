//! # mcp-server
//!
//! MCP (Model Context Protocol) server exposing bunq banking operations as
//! tools. Supports stdio and HTTP transports.

pub mod error;
pub mod protocol;
mod server;
pub mod tools;
pub mod transport;

pub use error::ToolError;
pub use protocol::{McpError, McpMessage, RequestHandler, ServerCapabilities};
pub use server::{McpServer, ServerMode};
pub use tools::{BankingTools, ToolExecutor, ToolRegistry};
pub use transport::{HttpTransport, StdioTransport};
