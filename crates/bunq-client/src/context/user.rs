//! User context loaded once the session is open

use serde_json::Value;
use tracing::{debug, warn};

use super::ApiContext;
use crate::error::{BunqError, Result};
use crate::http::extract_list;

/// Who we are acting for, and which account payments come from
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: u64,
    pub display_name: String,
    pub primary_monetary_account: Value,
}

impl UserContext {
    /// Resolve user and primary monetary account for the open session
    pub async fn load(context: &ApiContext) -> Result<Self> {
        let user = context.session_user().await;

        let items = context
            .get(&format!("user/{}/monetary-account-bank", user.id), &[])
            .await?;
        let accounts = extract_list(&items, "MonetaryAccountBank");
        let primary_monetary_account = select_primary_account(accounts)?;

        let display_name = user.display_name.unwrap_or_else(|| {
            warn!("Session user {} has no display name", user.id);
            String::new()
        });

        Ok(Self {
            user_id: user.id,
            display_name,
            primary_monetary_account,
        })
    }

    /// Build a context from known values
    pub fn new(user_id: u64, display_name: impl Into<String>, primary_monetary_account: Value) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            primary_monetary_account,
        }
    }

    /// Id of the primary monetary account
    pub fn primary_monetary_account_id(&self) -> Result<u64> {
        self.primary_monetary_account
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                BunqError::UnexpectedResponse("Primary monetary account has no id".to_string())
            })
    }
}

/// First active account, or the first account when none is active
fn select_primary_account(accounts: Vec<Value>) -> Result<Value> {
    let active = accounts
        .iter()
        .position(|account| account.get("status").and_then(Value::as_str) == Some("ACTIVE"));

    match active {
        Some(index) => {
            debug!("Primary monetary account is entry {}", index);
            Ok(accounts[index].clone())
        }
        None => accounts.into_iter().next().ok_or_else(|| {
            BunqError::UnexpectedResponse("User has no monetary accounts".to_string())
        }),
    }
}
