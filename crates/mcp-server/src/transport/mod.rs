//! Transport implementations for MCP server

mod http;
mod stdio;

pub use http::HttpTransport;
pub use stdio::StdioTransport;
