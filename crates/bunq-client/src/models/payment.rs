//! Payment and request-inquiry types

use serde::{Deserialize, Serialize};

use super::{Amount, Pointer};

/// Body shared by `payment` and `request-inquiry` creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub counterparty_alias: Pointer,
    pub description: String,
}

impl PaymentRequest {
    /// JSON body for `POST .../payment`
    pub fn payment_body(&self) -> serde_json::Value {
        serde_json::json!({
            "amount": self.amount,
            "counterparty_alias": self.counterparty_alias,
            "description": self.description,
        })
    }

    /// JSON body for `POST .../request-inquiry`; bunq.me fallback is always allowed
    pub fn request_inquiry_body(&self) -> serde_json::Value {
        serde_json::json!({
            "amount_inquired": self.amount,
            "counterparty_alias": self.counterparty_alias,
            "description": self.description,
            "allow_bunqme": true,
        })
    }
}

/// Typed view of a `Payment` record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    #[serde(default)]
    pub created: Option<String>,
    pub amount: Amount,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub counterparty_alias: Option<CounterpartyAlias>,
}

/// Label describing the other side of a payment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CounterpartyAlias {
    #[serde(default)]
    pub pointer: Option<AliasPointer>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub iban: Option<String>,
}

/// Alias as it appears in responses; fields are not validated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasPointer {
    #[serde(default, rename = "type")]
    pub alias_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CounterpartyAlias {
    /// Resolve the alias this label refers to.
    ///
    /// An explicit pointer wins; otherwise an IBAN label becomes an `IBAN`
    /// alias carrying the label's display name.
    pub fn resolved_pointer(&self) -> AliasPointer {
        if let Some(pointer) = &self.pointer {
            return pointer.clone();
        }

        match &self.iban {
            Some(iban) => AliasPointer {
                alias_type: Some("IBAN".to_string()),
                value: Some(iban.clone()),
                name: self.display_name.clone(),
            },
            None => AliasPointer {
                alias_type: None,
                value: None,
                name: self.display_name.clone(),
            },
        }
    }
}
