use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{membership::Membership, transaction::Transaction};

/// The whole persisted user table: one flat JSON document keyed by address.
pub type UserTable = BTreeMap<String, UserRecord>;

/// Per-address account: balance, memberships and the transaction ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub balance: Decimal,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl UserRecord {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: String::new(),
            email: String::new(),
            balance: Decimal::ZERO,
            memberships: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn membership(&self, id: Uuid) -> Option<&Membership> {
        self.memberships.iter().find(|m| m.id == id)
    }

    /// Prepends the entry, keeping the ledger newest-first.
    pub fn record_transaction(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }
}
