//! Tool execution errors

use bunq_client::BunqError;
use thiserror::Error;

/// Errors raised while executing a tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Failed to encode result: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Bunq(#[from] BunqError),
}
