//! bunq.me payment link types

use serde::{Deserialize, Serialize};

use super::Amount;

/// Entry describing what a bunq.me tab asks for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BunqMeTabEntry {
    pub amount_inquired: Amount,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

/// `BunqMeTab` record as returned by bunq
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BunqMeTab {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub bunqme_tab_share_url: Option<String>,
    #[serde(default)]
    pub bunqme_tab_entry: Option<BunqMeTabEntryView>,
}

/// Loose view of the entry nested in a returned tab
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BunqMeTabEntryView {
    #[serde(default)]
    pub share_url: Option<String>,
}

impl BunqMeTab {
    /// Shareable link: the tab URL first, then the entry URL
    pub fn share_url(&self) -> Option<&str> {
        self.bunqme_tab_share_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| {
                self.bunqme_tab_entry
                    .as_ref()
                    .and_then(|entry| entry.share_url.as_deref())
                    .filter(|url| !url.is_empty())
            })
    }
}
