//! Banking operations exposed to the tool layer

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::BunqConfig;
use crate::context::{ApiContext, UserContext};
use crate::error::{BunqError, Result};
use crate::http::{extract_id, extract_list, extract_object, ApiClient};
use crate::models::{
    BunqMeTab, BunqMeTabEntry, CardDebitRequest, Payment, PaymentRequest, SchedulePaymentRequest,
};
use crate::signing::KeyPair;

/// The bunq calls the MCP tools are built on.
///
/// Account-scoped calls always act on the primary monetary account of
/// [`BankingApi::user_context`].
#[async_trait]
pub trait BankingApi: Send + Sync {
    /// User and primary account resolved at startup
    fn user_context(&self) -> &UserContext;

    async fn list_monetary_accounts(&self) -> Result<Vec<Value>>;

    async fn list_invoices(&self) -> Result<Vec<Value>>;

    async fn list_subscription_contracts(&self) -> Result<Vec<Value>>;

    /// Returns the id of the new payment
    async fn create_payment(&self, request: &PaymentRequest) -> Result<u64>;

    async fn get_payment(&self, payment_id: u64) -> Result<Value>;

    /// Most recent payments first, at most `count`
    async fn list_payments(&self, count: u32) -> Result<Vec<Payment>>;

    /// Returns the id of the new request inquiry
    async fn create_request_inquiry(&self, request: &PaymentRequest) -> Result<u64>;

    async fn get_request_inquiry(&self, request_id: u64) -> Result<Value>;

    /// Returns the created card record
    async fn create_card_debit(&self, request: &CardDebitRequest) -> Result<Value>;

    /// Returns the id of the new schedule
    async fn create_schedule_payment(&self, request: &SchedulePaymentRequest) -> Result<u64>;

    async fn get_schedule(&self, schedule_id: u64) -> Result<Value>;

    /// Returns the id of the new tab
    async fn create_bunqme_tab(&self, entry: &BunqMeTabEntry) -> Result<u64>;

    async fn get_bunqme_tab(&self, tab_id: u64) -> Result<BunqMeTab>;
}

/// [`BankingApi`] over the bunq public API
#[derive(Debug)]
pub struct BunqClient {
    context: ApiContext,
    user: UserContext,
}

impl BunqClient {
    /// Open an API context and load the user context
    pub async fn connect(config: &BunqConfig) -> Result<Self> {
        let client = ApiClient::new(config.effective_base_url()?)?;
        info!(
            "Creating API context for {} ({})",
            config.environment,
            client.base_url()
        );

        let context =
            ApiContext::create(client, config.api_key.clone(), &config.device_description).await?;
        Self::from_context(context).await
    }

    /// Same as [`BunqClient::connect`] with a caller-provided client key
    pub async fn connect_with_key_pair(config: &BunqConfig, key_pair: KeyPair) -> Result<Self> {
        let client = ApiClient::new(config.effective_base_url()?)?;
        let context = ApiContext::create_with_key_pair(
            client,
            config.api_key.clone(),
            &config.device_description,
            key_pair,
        )
        .await?;
        Self::from_context(context).await
    }

    async fn from_context(context: ApiContext) -> Result<Self> {
        info!("Loading user context");
        let user = UserContext::load(&context).await?;
        info!(
            "Loaded user context for {} (id {})",
            user.display_name, user.user_id
        );
        Ok(Self { context, user })
    }

    fn user_path(&self, suffix: &str) -> String {
        format!("user/{}/{}", self.user.user_id, suffix)
    }

    fn account_path(&self, suffix: &str) -> Result<String> {
        Ok(format!(
            "user/{}/monetary-account/{}/{}",
            self.user.user_id,
            self.user.primary_monetary_account_id()?,
            suffix
        ))
    }

    async fn list(&self, path: &str, kind: &str, query: &[(&str, String)]) -> Result<Vec<Value>> {
        let items = self.context.get(path, query).await?;
        let records = extract_list(&items, kind);
        debug!("Listed {} {} records", records.len(), kind);
        Ok(records)
    }

    async fn fetch(&self, path: &str, kind: &str) -> Result<Value> {
        let items = self.context.get(path, &[]).await?;
        extract_object(&items, kind)
    }

    async fn create(&self, path: &str, body: &Value) -> Result<u64> {
        let items = self.context.post(path, body).await?;
        let id = extract_id(&items)?;
        debug!("Created {} with id {}", path, id);
        Ok(id)
    }
}

#[async_trait]
impl BankingApi for BunqClient {
    fn user_context(&self) -> &UserContext {
        &self.user
    }

    async fn list_monetary_accounts(&self) -> Result<Vec<Value>> {
        self.list(&self.user_path("monetary-account-bank"), "MonetaryAccountBank", &[])
            .await
    }

    async fn list_invoices(&self) -> Result<Vec<Value>> {
        self.list(&self.user_path("invoice"), "Invoice", &[]).await
    }

    async fn list_subscription_contracts(&self) -> Result<Vec<Value>> {
        self.list(
            &self.user_path("billing-contract-subscription"),
            "BillingContractSubscription",
            &[],
        )
        .await
    }

    async fn create_payment(&self, request: &PaymentRequest) -> Result<u64> {
        self.create(&self.account_path("payment")?, &request.payment_body())
            .await
    }

    async fn get_payment(&self, payment_id: u64) -> Result<Value> {
        self.fetch(&self.account_path(&format!("payment/{}", payment_id))?, "Payment")
            .await
    }

    async fn list_payments(&self, count: u32) -> Result<Vec<Payment>> {
        let records = self
            .list(
                &self.account_path("payment")?,
                "Payment",
                &[("count", count.to_string())],
            )
            .await?;

        records
            .into_iter()
            .map(|record| serde_json::from_value::<Payment>(record).map_err(BunqError::from))
            .collect()
    }

    async fn create_request_inquiry(&self, request: &PaymentRequest) -> Result<u64> {
        self.create(
            &self.account_path("request-inquiry")?,
            &request.request_inquiry_body(),
        )
        .await
    }

    async fn get_request_inquiry(&self, request_id: u64) -> Result<Value> {
        self.fetch(
            &self.account_path(&format!("request-inquiry/{}", request_id))?,
            "RequestInquiry",
        )
        .await
    }

    async fn create_card_debit(&self, request: &CardDebitRequest) -> Result<Value> {
        let items = self
            .context
            .post(&self.user_path("card-debit"), &serde_json::to_value(request)?)
            .await?;
        extract_object(&items, "CardDebit")
    }

    async fn create_schedule_payment(&self, request: &SchedulePaymentRequest) -> Result<u64> {
        self.create(
            &self.account_path("schedule-payment")?,
            &serde_json::to_value(request)?,
        )
        .await
    }

    async fn get_schedule(&self, schedule_id: u64) -> Result<Value> {
        self.fetch(
            &self.account_path(&format!("schedule/{}", schedule_id))?,
            "Schedule",
        )
        .await
    }

    async fn create_bunqme_tab(&self, entry: &BunqMeTabEntry) -> Result<u64> {
        self.create(
            &self.account_path("bunqme-tab")?,
            &serde_json::json!({ "bunqme_tab_entry": entry }),
        )
        .await
    }

    async fn get_bunqme_tab(&self, tab_id: u64) -> Result<BunqMeTab> {
        let record = self
            .fetch(&self.account_path(&format!("bunqme-tab/{}", tab_id))?, "BunqMeTab")
            .await?;
        Ok(serde_json::from_value(record)?)
    }
}
