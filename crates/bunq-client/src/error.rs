//! Error types for bunq-client

use thiserror::Error;

/// Result type alias for bunq operations
pub type Result<T> = std::result::Result<T, BunqError>;

/// bunq client error types
#[derive(Error, Debug)]
pub enum BunqError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid alias type. Must be EMAIL, PHONE_NUMBER, or IBAN")]
    InvalidAliasType(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bunq API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
