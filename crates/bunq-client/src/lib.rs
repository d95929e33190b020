//! # bunq-client
//!
//! Minimal client for the bunq public API, covering what the bunq MCP server
//! needs:
//! - Environment selection and API key handling
//! - The installation / device / session handshake with request signing
//! - Typed views of the few records the server reads
//! - The [`BankingApi`] trait the MCP tools are written against

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod models;
pub mod signing;

pub use api::{BankingApi, BunqClient};
pub use config::{ApiEnvironment, ApiKey, BunqConfig};
pub use context::{ApiContext, UserContext};
pub use error::{BunqError, Result};
pub use models::{
    AliasType, Amount, BunqMeTab, BunqMeTabEntry, CardDebitRequest, Payment, PaymentRequest,
    Pointer, RecurrenceUnit, ScheduleEntry, SchedulePaymentEntry, SchedulePaymentRequest,
};
pub use signing::KeyPair;
