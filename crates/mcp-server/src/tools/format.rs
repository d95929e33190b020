//! Flattened payment records returned by `fetch_last_payments`

use bunq_client::Payment;
use serde::{Deserialize, Serialize};

/// One payment in transport shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPayment {
    pub id: u64,
    pub created: Option<String>,
    pub amount: RecentAmount,
    pub description: Option<String>,
    pub counterparty: RecentCounterparty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentAmount {
    pub value: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCounterparty {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub alias_type: Option<String>,
    pub value: Option<String>,
}

impl From<&Payment> for RecentPayment {
    fn from(payment: &Payment) -> Self {
        let pointer = payment
            .counterparty_alias
            .as_ref()
            .map(|alias| alias.resolved_pointer())
            .unwrap_or_default();

        Self {
            id: payment.id,
            created: payment.created.clone(),
            amount: RecentAmount {
                value: payment.amount.value.clone(),
                currency: payment.amount.currency.clone(),
            },
            description: payment.description.clone(),
            counterparty: RecentCounterparty {
                name: pointer.name,
                alias_type: pointer.alias_type,
                value: pointer.value,
            },
        }
    }
}

/// Flatten payments, keeping their order
pub fn format_recent_payments(payments: &[Payment]) -> Vec<RecentPayment> {
    payments.iter().map(RecentPayment::from).collect()
}
