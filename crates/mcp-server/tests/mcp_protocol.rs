//! End-to-end MCP exchanges against an in-memory bunq account

use async_trait::async_trait;
use bunq_client::{
    BankingApi, BunqError, BunqMeTab, BunqMeTabEntry, CardDebitRequest, Payment, PaymentRequest,
    SchedulePaymentRequest, UserContext,
};
use mcp_server::StdioTransport;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

struct FakeBank {
    user: UserContext,
    payments: Vec<Payment>,
    tab: BunqMeTab,
    created: Mutex<Vec<Value>>,
}

impl FakeBank {
    fn new() -> Self {
        let payments = serde_json::from_value(json!([
            {
                "id": 3,
                "created": "2024-06-03 09:00:00.000000",
                "amount": {"value": "-7.50", "currency": "EUR"},
                "description": "Lunch",
                "counterparty_alias": {
                    "pointer": {"type": "EMAIL", "value": "cafe@example.com", "name": "Cafe"}
                }
            },
            {
                "id": 2,
                "created": "2024-06-02 09:00:00.000000",
                "amount": {"value": "1200.00", "currency": "EUR"},
                "description": "Salary",
                "counterparty_alias": {
                    "iban": "NL91BUNQ0417164300",
                    "display_name": "Employer BV"
                }
            },
            {
                "id": 1,
                "amount": {"value": "-3.00", "currency": "EUR"}
            }
        ]))
        .unwrap();

        let tab = serde_json::from_value(json!({
            "id": 12,
            "bunqme_tab_share_url": "",
            "bunqme_tab_entry": {"share_url": "https://bunq.me/t/entry-12"},
            "status": "WAITING_FOR_PAYMENT"
        }))
        .unwrap();

        Self {
            user: UserContext::new(
                4242,
                "Sam Saver",
                json!({"id": 900, "status": "ACTIVE", "currency": "EUR"}),
            ),
            payments,
            tab,
            created: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BankingApi for FakeBank {
    fn user_context(&self) -> &UserContext {
        &self.user
    }

    async fn list_monetary_accounts(&self) -> bunq_client::Result<Vec<Value>> {
        Ok(vec![self.user.primary_monetary_account.clone()])
    }

    async fn list_invoices(&self) -> bunq_client::Result<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn list_subscription_contracts(&self) -> bunq_client::Result<Vec<Value>> {
        Ok(vec![json!({"id": 5, "status": "ACTIVE"})])
    }

    async fn create_payment(&self, request: &PaymentRequest) -> bunq_client::Result<u64> {
        self.created.lock().unwrap().push(request.payment_body());
        Ok(70)
    }

    async fn get_payment(&self, payment_id: u64) -> bunq_client::Result<Value> {
        Ok(json!({"id": payment_id}))
    }

    async fn list_payments(&self, count: u32) -> bunq_client::Result<Vec<Payment>> {
        Ok(self.payments.iter().take(count as usize).cloned().collect())
    }

    async fn create_request_inquiry(&self, request: &PaymentRequest) -> bunq_client::Result<u64> {
        self.created.lock().unwrap().push(request.request_inquiry_body());
        Ok(71)
    }

    async fn get_request_inquiry(&self, request_id: u64) -> bunq_client::Result<Value> {
        Ok(json!({"id": request_id}))
    }

    async fn create_card_debit(&self, _request: &CardDebitRequest) -> bunq_client::Result<Value> {
        Err(BunqError::Api {
            status: 400,
            message: "Card limit reached.".to_string(),
        })
    }

    async fn create_schedule_payment(
        &self,
        _request: &SchedulePaymentRequest,
    ) -> bunq_client::Result<u64> {
        Ok(72)
    }

    async fn get_schedule(&self, schedule_id: u64) -> bunq_client::Result<Value> {
        Ok(json!({"id": schedule_id}))
    }

    async fn create_bunqme_tab(&self, _entry: &BunqMeTabEntry) -> bunq_client::Result<u64> {
        Ok(12)
    }

    async fn get_bunqme_tab(&self, _tab_id: u64) -> bunq_client::Result<BunqMeTab> {
        Ok(self.tab.clone())
    }
}

/// Feed `requests` through the stdio transport and collect the responses
async fn run_session(bank: Arc<FakeBank>, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();

    StdioTransport::new(bank)
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_handshake_and_listing() {
    let responses = run_session(
        Arc::new(FakeBank::new()),
        &[
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "integration", "version": "0.0.1"}
                }
            }),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "bunq");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 12);
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
        assert!(tool["description"].is_string());
    }
}

#[tokio::test]
async fn test_fetch_last_payments_flattens_records() {
    let responses = run_session(
        Arc::new(FakeBank::new()),
        &[tool_call(1, "fetch_last_payments", json!({"count": 2}))],
    )
    .await;

    let payments: Value = serde_json::from_str(text(&responses[0])).unwrap();
    assert_eq!(
        payments,
        json!([
            {
                "id": 3,
                "created": "2024-06-03 09:00:00.000000",
                "amount": {"value": "-7.50", "currency": "EUR"},
                "description": "Lunch",
                "counterparty": {"name": "Cafe", "type": "EMAIL", "value": "cafe@example.com"}
            },
            {
                "id": 2,
                "created": "2024-06-02 09:00:00.000000",
                "amount": {"value": "1200.00", "currency": "EUR"},
                "description": "Salary",
                "counterparty": {"name": "Employer BV", "type": "IBAN", "value": "NL91BUNQ0417164300"}
            }
        ])
    );
}

#[tokio::test]
async fn test_fetch_last_payments_rejects_zero() {
    let responses = run_session(
        Arc::new(FakeBank::new()),
        &[tool_call(1, "fetch_last_payments", json!({"count": 0}))],
    )
    .await;

    assert_eq!(responses[0]["result"]["isError"], true);
    assert!(text(&responses[0]).contains("between 1 and 200"));
}

#[tokio::test]
async fn test_payment_and_request_bodies() {
    let bank = Arc::new(FakeBank::new());
    let arguments = json!({
        "amount": "25.00",
        "currency": "EUR",
        "alias_type": "PHONE_NUMBER",
        "alias_value": "+31612345678",
        "counterparty_name": "Alex",
        "description": "Concert"
    });

    let responses = run_session(
        bank.clone(),
        &[
            tool_call(1, "send_payment", arguments.clone()),
            tool_call(2, "request_money", arguments),
        ],
    )
    .await;

    assert_eq!(serde_json::from_str::<Value>(text(&responses[0])).unwrap()["id"], 70);
    assert_eq!(serde_json::from_str::<Value>(text(&responses[1])).unwrap()["id"], 71);

    let created = bank.created.lock().unwrap().clone();
    assert_eq!(created[0]["amount"], json!({"value": "25.00", "currency": "EUR"}));
    assert_eq!(
        created[0]["counterparty_alias"],
        json!({"type": "PHONE_NUMBER", "value": "+31612345678", "name": "Alex"})
    );
    assert_eq!(created[1]["amount_inquired"]["value"], "25.00");
    assert_eq!(created[1]["allow_bunqme"], true);
}

#[tokio::test]
async fn test_bunq_me_link_uses_entry_url() {
    let responses = run_session(
        Arc::new(FakeBank::new()),
        &[tool_call(
            1,
            "generate_bunq_me_link",
            json!({"amount": "9.99", "currency": "EUR", "description": "Pizza"}),
        )],
    )
    .await;

    assert_eq!(text(&responses[0]), "https://bunq.me/t/entry-12");
}

#[tokio::test]
async fn test_api_errors_surface_as_tool_errors() {
    let responses = run_session(
        Arc::new(FakeBank::new()),
        &[tool_call(
            1,
            "create_card",
            json!({"second_line": "Groceries", "type": "MASTERCARD", "product_type": "MASTERCARD_DEBIT"}),
        )],
    )
    .await;

    assert_eq!(responses[0]["result"]["isError"], true);
    assert_eq!(text(&responses[0]), "bunq API error (400): Card limit reached.");
}
