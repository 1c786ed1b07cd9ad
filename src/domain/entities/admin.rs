use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Platform operator singleton. Its `balance` is an informational running
/// total of all credited membership payments; the authoritative per-admin
/// balance lives in that admin's own `UserRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    pub name: String,
    pub address: String,
    pub balance: Decimal,
    pub configured: bool,
}

impl Default for AdminRecord {
    fn default() -> Self {
        Self {
            name: "System Admin".to_string(),
            address: String::new(),
            balance: Decimal::ZERO,
            configured: false,
        }
    }
}
