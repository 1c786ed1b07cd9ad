use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    MembershipPayment,
    /// Admin-side mirror of a membership payment
    PaymentReceived,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransactionStatus {
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn is_successful(&self) -> bool {
        matches!(self, TransactionStatus::Completed)
    }
}

/// One immutable ledger entry. Ledgers are ordered newest-first: every
/// mutation prepends, never appends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_title: Option<String>,
    /// Payer address, set on admin-side `payment_received` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Failure explanation on `failed` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// On-chain transfer hash reported with a deposit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Destination address of a withdrawal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Set when the charge was scheduler-initiated
    #[serde(default, skip_serializing_if = "is_false")]
    pub automatic: bool,
    /// Set when the charge was created via the retry endpoint
    #[serde(default, skip_serializing_if = "is_false")]
    pub retried: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Transaction {
    /// A bare completed entry; optional fields are filled in by the caller.
    pub fn new(
        id: Uuid,
        kind: TransactionType,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            amount,
            status: TransactionStatus::Completed,
            timestamp,
            membership_id: None,
            membership_title: None,
            from: None,
            reason: None,
            tx_hash: None,
            recipient: None,
            automatic: false,
            retried: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        assert!(TransactionStatus::Completed.is_successful());
        assert!(!TransactionStatus::Failed.is_successful());
    }

    #[test]
    fn test_type_serialization() {
        assert_eq!(TransactionType::MembershipPayment.as_ref(), "membership_payment");
        assert_eq!(TransactionType::PaymentReceived.as_ref(), "payment_received");
        assert_eq!(
            serde_json::to_string(&TransactionType::Deposit).unwrap(),
            "\"deposit\""
        );
    }

    #[test]
    fn test_optional_fields_omitted() {
        let tx = Transaction::new(
            Uuid::nil(),
            TransactionType::Deposit,
            Decimal::new(5000, 2),
            chrono::DateTime::<Utc>::UNIX_EPOCH,
        );
        let json = serde_json::to_value(&tx).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("type"));
        assert!(!obj.contains_key("membershipId"));
        assert!(!obj.contains_key("automatic"));
        assert!(!obj.contains_key("retried"));
        assert!(!obj.contains_key("reason"));
    }
}
