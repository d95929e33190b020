//! The banking tools: validate, call bunq, reshape the reply

use bunq_client::{
    AliasType, Amount, BankingApi, BunqMeTabEntry, CardDebitRequest, PaymentRequest, Pointer,
    ScheduleEntry, SchedulePaymentEntry, SchedulePaymentRequest,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::format::{format_recent_payments, RecentPayment};
use crate::error::ToolError;

/// Default number of payments returned by `fetch_last_payments`
pub const DEFAULT_PAYMENT_COUNT: u32 = 10;
/// Largest page bunq serves
pub const MAX_PAYMENT_COUNT: u32 = 200;

const LINK_FAILURE_PREFIX: &str = "URL generation failed";

/// Arguments shared by `send_payment` and `request_money`
#[derive(Debug, Clone)]
pub struct CounterpartyPayment {
    pub amount: String,
    pub currency: String,
    pub alias_type: String,
    pub alias_value: String,
    pub counterparty_name: String,
    pub description: String,
}

impl CounterpartyPayment {
    fn into_request(self) -> Result<PaymentRequest, ToolError> {
        let alias_type: AliasType = self.alias_type.parse()?;

        Ok(PaymentRequest {
            amount: Amount::new(self.amount, self.currency),
            counterparty_alias: Pointer::new(
                alias_type,
                self.alias_value,
                Some(self.counterparty_name),
            ),
            description: self.description,
        })
    }
}

/// Banking operations backed by a [`BankingApi`]
#[derive(Clone)]
pub struct BankingTools {
    api: Arc<dyn BankingApi>,
}

impl BankingTools {
    pub fn new(api: Arc<dyn BankingApi>) -> Self {
        Self { api }
    }

    pub fn get_user_id(&self) -> String {
        info!("Getting user id");
        self.api.user_context().user_id.to_string()
    }

    pub fn get_user_display_name(&self) -> String {
        info!("Getting display name");
        self.api.user_context().display_name.clone()
    }

    /// Record of the primary monetary account
    pub fn get_primary_monetary_account(&self) -> Value {
        info!("Getting primary monetary account");
        self.api.user_context().primary_monetary_account.clone()
    }

    pub async fn list_monetary_accounts(&self) -> Result<Vec<Value>, ToolError> {
        info!("Listing monetary accounts");
        Ok(self.api.list_monetary_accounts().await?)
    }

    pub async fn list_user_invoices(&self) -> Result<Vec<Value>, ToolError> {
        info!("Listing user invoices");
        Ok(self.api.list_invoices().await?)
    }

    pub async fn get_subscription_contracts(&self) -> Result<Vec<Value>, ToolError> {
        info!("Getting subscription contracts");
        Ok(self.api.list_subscription_contracts().await?)
    }

    /// Send money and return the created payment
    pub async fn send_payment(&self, args: CounterpartyPayment) -> Result<Value, ToolError> {
        info!("Sending payment");
        let request = args.into_request()?;
        let payment_id = self.api.create_payment(&request).await?;
        Ok(self.api.get_payment(payment_id).await?)
    }

    /// Ask for money and return the created request inquiry
    pub async fn request_money(&self, args: CounterpartyPayment) -> Result<Value, ToolError> {
        info!("Requesting payment");
        let request = args.into_request()?;
        let request_id = self.api.create_request_inquiry(&request).await?;
        Ok(self.api.get_request_inquiry(request_id).await?)
    }

    /// Order a debit card in the user's name
    pub async fn create_card(
        &self,
        second_line: String,
        card_type: String,
        product_type: String,
    ) -> Result<Value, ToolError> {
        info!("Creating debit card");
        let request = CardDebitRequest {
            second_line,
            name_on_card: self.api.user_context().display_name.clone(),
            card_type,
            product_type,
        };
        Ok(self.api.create_card_debit(&request).await?)
    }

    pub async fn fetch_last_payments(&self, count: u32) -> Result<Vec<RecentPayment>, ToolError> {
        info!("Fetching last {} payments", count);
        if count == 0 || count > MAX_PAYMENT_COUNT {
            return Err(ToolError::InvalidArguments(format!(
                "count must be between 1 and {}",
                MAX_PAYMENT_COUNT
            )));
        }

        let payments = self.api.list_payments(count).await?;
        Ok(format_recent_payments(&payments))
    }

    /// Create a (recurring) scheduled payment from the primary account
    pub async fn schedule_payment(
        &self,
        payment: SchedulePaymentEntry,
        schedule: ScheduleEntry,
        description: String,
    ) -> Result<Value, ToolError> {
        info!("Scheduling payment");
        let request = SchedulePaymentRequest {
            payment,
            schedule,
            purpose: description,
        };
        let schedule_id = self.api.create_schedule_payment(&request).await?;
        Ok(self.api.get_schedule(schedule_id).await?)
    }

    /// Create a bunq.me tab and return its share URL.
    ///
    /// Never fails: any error is folded into the returned text.
    pub async fn generate_bunq_me_link(
        &self,
        amount: String,
        currency: String,
        description: String,
        redirect_url: Option<String>,
    ) -> String {
        info!("Generating bunq.me link");
        let entry = BunqMeTabEntry {
            amount_inquired: Amount::new(amount, currency),
            description,
            redirect_url,
            share_url: None,
        };

        match self.create_share_url(&entry).await {
            Ok(Some(url)) => url,
            Ok(None) => format!(
                "{}: Could not find share URL in the response",
                LINK_FAILURE_PREFIX
            ),
            Err(e) => {
                warn!("bunq.me link generation failed: {}", e);
                format!("{}: {}", LINK_FAILURE_PREFIX, e)
            }
        }
    }

    async fn create_share_url(&self, entry: &BunqMeTabEntry) -> bunq_client::Result<Option<String>> {
        let tab_id = self.api.create_bunqme_tab(entry).await?;
        let tab = self.api.get_bunqme_tab(tab_id).await?;
        Ok(tab.share_url().map(str::to_string))
    }
}
