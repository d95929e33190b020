//! Execute MCP tools against the banking tools

use bunq_client::{BankingApi, ScheduleEntry, SchedulePaymentEntry};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::banking::{BankingTools, CounterpartyPayment, DEFAULT_PAYMENT_COUNT};
use crate::error::ToolError;
use crate::protocol::ToolCallResult;

/// Executor for MCP tools
pub struct ToolExecutor {
    tools: BankingTools,
}

#[derive(Debug, Deserialize)]
struct PaymentArgs {
    #[serde(deserialize_with = "string_or_number")]
    amount: String,
    currency: String,
    alias_type: String,
    alias_value: String,
    counterparty_name: String,
    description: String,
}

impl From<PaymentArgs> for CounterpartyPayment {
    fn from(args: PaymentArgs) -> Self {
        Self {
            amount: args.amount,
            currency: args.currency,
            alias_type: args.alias_type,
            alias_value: args.alias_value,
            counterparty_name: args.counterparty_name,
            description: args.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CardArgs {
    second_line: String,
    #[serde(rename = "type")]
    card_type: String,
    product_type: String,
}

#[derive(Debug, Deserialize)]
struct FetchPaymentsArgs {
    #[serde(default = "default_count")]
    count: u32,
}

fn default_count() -> u32 {
    DEFAULT_PAYMENT_COUNT
}

#[derive(Debug, Deserialize)]
struct ScheduleArgs {
    payment: SchedulePaymentEntry,
    schedule: ScheduleEntry,
    description: String,
}

#[derive(Debug, Deserialize)]
struct BunqMeLinkArgs {
    #[serde(deserialize_with = "string_or_number")]
    amount: String,
    currency: String,
    description: String,
    #[serde(default)]
    redirect_url: Option<String>,
}

/// Accept amounts sent either as `"10.00"` or `10.0`
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

impl ToolExecutor {
    /// Create a new tool executor
    pub fn new(api: Arc<dyn BankingApi>) -> Self {
        Self {
            tools: BankingTools::new(api),
        }
    }

    /// Execute a tool by name
    pub async fn execute(
        &self,
        tool_name: &str,
        arguments: Option<Value>,
    ) -> Result<ToolCallResult, ToolError> {
        debug!("Executing tool: {}", tool_name);

        let tools = &self.tools;
        match tool_name {
            "get_user_id" => Ok(ToolCallResult::text(tools.get_user_id())),
            "get_user_display_name" => Ok(ToolCallResult::text(tools.get_user_display_name())),
            "get_primary_monetary_account_id" => json_result(&tools.get_primary_monetary_account()),
            "get_list_monetary_accounts" => json_result(&tools.list_monetary_accounts().await?),
            "list_user_invoices" => json_result(&tools.list_user_invoices().await?),
            "get_subscription_contracts" => {
                json_result(&tools.get_subscription_contracts().await?)
            }
            "send_payment" => {
                let args: PaymentArgs = parse_args(arguments)?;
                json_result(&tools.send_payment(args.into()).await?)
            }
            "request_money" => {
                let args: PaymentArgs = parse_args(arguments)?;
                json_result(&tools.request_money(args.into()).await?)
            }
            "create_card" => {
                let args: CardArgs = parse_args(arguments)?;
                json_result(
                    &tools
                        .create_card(args.second_line, args.card_type, args.product_type)
                        .await?,
                )
            }
            "fetch_last_payments" => {
                let args: FetchPaymentsArgs = parse_args(arguments)?;
                json_result(&tools.fetch_last_payments(args.count).await?)
            }
            "schedule_payment" => {
                let args: ScheduleArgs = parse_args(arguments)?;
                json_result(
                    &tools
                        .schedule_payment(args.payment, args.schedule, args.description)
                        .await?,
                )
            }
            "generate_bunq_me_link" => {
                let args: BunqMeLinkArgs = parse_args(arguments)?;
                let link = tools
                    .generate_bunq_me_link(
                        args.amount,
                        args.currency,
                        args.description,
                        args.redirect_url,
                    )
                    .await;
                Ok(ToolCallResult::text(link))
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

/// Decode tool arguments; a missing argument object counts as `{}`
fn parse_args<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T, ToolError> {
    let arguments = arguments.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Pretty-printed JSON text result
fn json_result<T: Serialize>(value: &T) -> Result<ToolCallResult, ToolError> {
    Ok(ToolCallResult::text(serde_json::to_string_pretty(value)?))
}
