use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Lifecycle state of a membership with respect to recurring billing.
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
#[derive(Default)]
pub enum MembershipStatus {
    /// Billed automatically when the next payment date comes due
    #[default]
    Active,
    /// Excluded from automatic billing until resumed
    Paused,
    /// Last automatic charge bounced; requires an explicit retry
    PaymentFailed,
}

impl MembershipStatus {
    /// Human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "Membership is active",
            MembershipStatus::Paused => "Membership is paused",
            MembershipStatus::PaymentFailed => "Last payment failed",
        }
    }

    /// Whether the automatic sweep may evaluate this membership
    pub fn is_sweepable(&self) -> bool {
        matches!(self, MembershipStatus::Active)
    }

    /// Whether the membership needs user attention
    pub fn needs_attention(&self) -> bool {
        matches!(self, MembershipStatus::PaymentFailed)
    }

    /// Valid transitions from this state
    pub fn valid_transitions(&self) -> &'static [MembershipStatus] {
        match self {
            MembershipStatus::Active => {
                &[MembershipStatus::Paused, MembershipStatus::PaymentFailed]
            }
            MembershipStatus::Paused => &[MembershipStatus::Active],
            MembershipStatus::PaymentFailed => &[MembershipStatus::Active],
        }
    }

    /// Check if transition to the given state is valid
    pub fn can_transition_to(&self, new_state: MembershipStatus) -> bool {
        self.valid_transitions().contains(&new_state)
    }
}

/// A recurring billing agreement between a user and an operator.
///
/// `next_payment_date` drives the automatic sweep: a membership without one
/// is never auto-charged. `charge_date` is the day-of-month anchor used to
/// compute successive due dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    /// Day of month (1-31) the charge anchors to
    pub charge_date: u32,
    #[serde(default)]
    pub status: MembershipStatus,
    /// Display name of the funds recipient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,
    /// Address credited on successful charges; absent means crediting is skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_paid_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_payment_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_properties() {
        assert!(MembershipStatus::Active.is_sweepable());
        assert!(!MembershipStatus::Active.needs_attention());

        assert!(!MembershipStatus::Paused.is_sweepable());
        assert!(!MembershipStatus::Paused.needs_attention());

        assert!(!MembershipStatus::PaymentFailed.is_sweepable());
        assert!(MembershipStatus::PaymentFailed.needs_attention());
    }

    #[test]
    fn test_valid_transitions() {
        // From Active, billing can only fail; pausing happens outside the engine
        assert!(MembershipStatus::Active.can_transition_to(MembershipStatus::PaymentFailed));
        assert!(MembershipStatus::Active.can_transition_to(MembershipStatus::Paused));

        // A failed membership recovers through a successful retry
        assert!(MembershipStatus::PaymentFailed.can_transition_to(MembershipStatus::Active));
        assert!(!MembershipStatus::PaymentFailed.can_transition_to(MembershipStatus::Paused));

        // Paused resumes to active only
        assert!(MembershipStatus::Paused.can_transition_to(MembershipStatus::Active));
        assert!(!MembershipStatus::Paused.can_transition_to(MembershipStatus::PaymentFailed));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "active".parse::<MembershipStatus>().unwrap(),
            MembershipStatus::Active
        );
        assert_eq!(
            "paused".parse::<MembershipStatus>().unwrap(),
            MembershipStatus::Paused
        );
        assert_eq!(
            "payment_failed".parse::<MembershipStatus>().unwrap(),
            MembershipStatus::PaymentFailed
        );
        assert!("invalid".parse::<MembershipStatus>().is_err());
    }

    #[test]
    fn test_display_matches_as_ref() {
        for variant in [
            MembershipStatus::Active,
            MembershipStatus::Paused,
            MembershipStatus::PaymentFailed,
        ] {
            assert_eq!(format!("{}", variant), variant.as_ref());
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&MembershipStatus::PaymentFailed).unwrap();
        assert_eq!(json, "\"payment_failed\"");
        let parsed: MembershipStatus = serde_json::from_str("\"payment_failed\"").unwrap();
        assert_eq!(parsed, MembershipStatus::PaymentFailed);
    }
}
