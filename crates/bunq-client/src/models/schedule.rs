//! Scheduled payment types

use serde::{Deserialize, Serialize};

use super::{Amount, Pointer};

/// How often a schedule repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceUnit {
    Once,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Timing part of a scheduled payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// ISO 8601 start time
    pub time_start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    pub recurrence_unit: RecurrenceUnit,
    pub recurrence_size: u32,
}

/// Payment part of a scheduled payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePaymentEntry {
    pub amount: Amount,
    pub counterparty_alias: Pointer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `POST .../schedule-payment`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePaymentRequest {
    pub payment: SchedulePaymentEntry,
    pub schedule: ScheduleEntry,
    pub purpose: String,
}
