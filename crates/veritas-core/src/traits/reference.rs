use serde::{Deserialize, Serialize};

use crate::models::Country;

/// Merchant directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantRecord {
    pub name: String,
    pub country: Country,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Postal directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalRecord {
    pub postal_code: String,
    pub country: Country,
    pub locality: Option<String>,
}

/// Read-only merchant lookup. `None` means not found.
pub trait IMerchantDirectory: Send + Sync {
    fn lookup(&self, name: &str) -> Option<MerchantRecord>;
}

/// Read-only postal-code lookup. `None` means not found.
pub trait IPostalDirectory: Send + Sync {
    fn lookup(&self, postal_code: &str) -> Option<PostalRecord>;
}
