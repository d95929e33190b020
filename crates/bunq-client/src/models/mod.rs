//! bunq record types
//!
//! Most records are passed through to callers as raw JSON. The types here
//! cover request bodies and the handful of response fields this crate reads.

mod bunqme;
mod payment;
mod schedule;

pub use bunqme::{BunqMeTab, BunqMeTabEntry, BunqMeTabEntryView};
pub use payment::{AliasPointer, CounterpartyAlias, Payment, PaymentRequest};
pub use schedule::{RecurrenceUnit, ScheduleEntry, SchedulePaymentEntry, SchedulePaymentRequest};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BunqError;

/// Monetary amount as bunq transmits it (decimal string + ISO currency)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    pub currency: String,
}

impl Amount {
    pub fn new(value: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: currency.into(),
        }
    }
}

/// Kind of alias used to address a counterparty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum AliasType {
    Email,
    PhoneNumber,
    Iban,
}

impl AliasType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::Iban => "IBAN",
        }
    }
}

impl FromStr for AliasType {
    type Err = BunqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL" => Ok(Self::Email),
            "PHONE_NUMBER" => Ok(Self::PhoneNumber),
            "IBAN" => Ok(Self::Iban),
            other => Err(BunqError::InvalidAliasType(other.to_string())),
        }
    }
}

impl TryFrom<String> for AliasType {
    type Error = BunqError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for AliasType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counterparty alias sent with payments and requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pointer {
    #[serde(rename = "type")]
    pub alias_type: AliasType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Pointer {
    pub fn new(alias_type: AliasType, value: impl Into<String>, name: Option<String>) -> Self {
        Self {
            alias_type,
            value: value.into(),
            name,
        }
    }
}

/// Body of `POST user/{id}/card-debit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDebitRequest {
    pub second_line: String,
    pub name_on_card: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub product_type: String,
}
