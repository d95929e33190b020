//! MCP tool definitions for the bunq tools

use serde_json::{json, Map, Value};

use super::banking::{DEFAULT_PAYMENT_COUNT, MAX_PAYMENT_COUNT};
use crate::protocol::{McpInputSchema, McpTool};

/// Static registry of the tools this server exposes
pub struct ToolRegistry {
    tools: Vec<McpTool>,
}

/// Builder for an object input schema
#[derive(Default)]
struct SchemaBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    fn required(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self.required.push(name.to_string());
        self
    }

    fn optional(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self
    }

    fn build(self) -> McpInputSchema {
        McpInputSchema {
            schema_type: "object".to_string(),
            properties: if self.properties.is_empty() { None } else { Some(self.properties) },
            required: if self.required.is_empty() { None } else { Some(self.required) },
        }
    }
}

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn alias_type() -> Value {
    json!({
        "type": "string",
        "enum": ["EMAIL", "PHONE_NUMBER", "IBAN"],
        "description": "Kind of alias identifying the counterparty"
    })
}

fn amount_object() -> Value {
    json!({
        "type": "object",
        "properties": {
            "value": string("Amount as a decimal string, e.g. 10.00"),
            "currency": string("ISO 4217 currency code, e.g. EUR")
        },
        "required": ["value", "currency"]
    })
}

fn tool(name: &str, description: &str, input_schema: McpInputSchema) -> McpTool {
    McpTool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

fn counterparty_payment_schema(verb: &str) -> McpInputSchema {
    SchemaBuilder::default()
        .required("amount", string(&format!("The amount to {}, e.g. 10.00", verb)))
        .required("currency", string("The currency code, e.g. EUR"))
        .required("alias_type", alias_type())
        .required("alias_value", string("Email address, phone number or IBAN of the counterparty"))
        .required("counterparty_name", string("Name of the counterparty"))
        .required("description", string("Description shown to both parties"))
        .build()
}

impl ToolRegistry {
    /// Create the registry with every bunq tool
    pub fn new() -> Self {
        let empty = || SchemaBuilder::default().build();

        let tools = vec![
            tool("get_user_id", "Returns the current bunq user ID.", empty()),
            tool(
                "get_user_display_name",
                "Returns the display name of the current bunq user.",
                empty(),
            ),
            tool(
                "get_primary_monetary_account_id",
                "Returns the primary monetary account, including its ID.",
                empty(),
            ),
            tool(
                "get_list_monetary_accounts",
                "Lists the monetary accounts of the current user.",
                empty(),
            ),
            tool(
                "list_user_invoices",
                "Lists all invoices for the current user.",
                empty(),
            ),
            tool(
                "get_subscription_contracts",
                "Retrieves all subscription contracts for the user.",
                empty(),
            ),
            tool(
                "send_payment",
                "Sends a payment from the primary account to a counterparty and returns the created payment.",
                counterparty_payment_schema("send"),
            ),
            tool(
                "request_money",
                "Creates a payment request (request inquiry) and returns it. The counterparty may pay through bunq.me.",
                counterparty_payment_schema("request"),
            ),
            tool(
                "create_card",
                "Creates a new debit card in the user's name and returns the card.",
                SchemaBuilder::default()
                    .required("second_line", string("Second line text on the card"))
                    .required("type", string("Type of card, e.g. MAESTRO or MASTERCARD"))
                    .required("product_type", string("Product type, e.g. MASTERCARD_DEBIT"))
                    .build(),
            ),
            tool(
                "fetch_last_payments",
                "Fetches the most recent payments of the primary account, newest first.",
                SchemaBuilder::default()
                    .optional(
                        "count",
                        json!({
                            "type": "integer",
                            "minimum": 1,
                            "maximum": MAX_PAYMENT_COUNT,
                            "default": DEFAULT_PAYMENT_COUNT,
                            "description": "The maximum number of payments to retrieve"
                        }),
                    )
                    .build(),
            ),
            tool(
                "schedule_payment",
                "Schedules a (recurring) payment to a recipient and returns the created schedule.",
                SchemaBuilder::default()
                    .required(
                        "payment",
                        json!({
                            "type": "object",
                            "properties": {
                                "amount": amount_object(),
                                "counterparty_alias": {
                                    "type": "object",
                                    "properties": {
                                        "type": alias_type(),
                                        "value": string("Email address, phone number or IBAN"),
                                        "name": string("Name of the recipient")
                                    },
                                    "required": ["type", "value"]
                                }
                            },
                            "required": ["amount", "counterparty_alias"]
                        }),
                    )
                    .required(
                        "schedule",
                        json!({
                            "type": "object",
                            "properties": {
                                "time_start": string("ISO 8601 start time"),
                                "time_end": string("Optional ISO 8601 end time"),
                                "recurrence_unit": {
                                    "type": "string",
                                    "enum": ["ONCE", "HOURLY", "DAILY", "WEEKLY", "MONTHLY", "YEARLY"]
                                },
                                "recurrence_size": {
                                    "type": "integer",
                                    "minimum": 1,
                                    "description": "Interval between recurrences"
                                }
                            },
                            "required": ["time_start", "recurrence_unit", "recurrence_size"]
                        }),
                    )
                    .required("description", string("Purpose of the scheduled payment"))
                    .build(),
            ),
            tool(
                "generate_bunq_me_link",
                "Generates a shareable bunq.me payment link. Returns the link or an error message.",
                SchemaBuilder::default()
                    .required("amount", string("The amount requested, e.g. 10.00"))
                    .required("currency", string("The currency code, e.g. EUR"))
                    .required("description", string("Purpose of the request"))
                    .optional("redirect_url", string("URL to redirect to after payment"))
                    .build(),
            ),
        ];

        Self { tools }
    }

    /// All tool definitions, in registration order
    pub fn definitions(&self) -> &[McpTool] {
        &self.tools
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
