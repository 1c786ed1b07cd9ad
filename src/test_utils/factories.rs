//! Test data factories for creating valid fixtures.
//!
//! Each factory creates a complete object with sensible defaults. Use the
//! closure parameter to override specific fields as needed.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::entities::{
    membership::{Membership, MembershipStatus},
    user::UserRecord,
};

/// Create a test user with sensible defaults.
pub fn create_test_user(address: &str, overrides: impl FnOnce(&mut UserRecord)) -> UserRecord {
    let mut user = UserRecord::new(address);
    user.name = "Test User".to_string();
    overrides(&mut user);
    user
}

/// Create a test membership with sensible defaults. Unscheduled and without
/// a recipient unless overridden.
pub fn create_test_membership(overrides: impl FnOnce(&mut Membership)) -> Membership {
    let mut membership = Membership {
        id: Uuid::new_v4(),
        title: "Premium Member".to_string(),
        description: "Access to all premium features".to_string(),
        amount: Decimal::new(2_999, 2),
        charge_date: 15,
        status: MembershipStatus::Active,
        admin: None,
        admin_address: None,
        next_payment_date: None,
        last_paid_date: None,
        failed_payment_date: None,
    };
    overrides(&mut membership);
    membership
}

/// Consistent test instant (2024-01-15 12:00:00 UTC).
pub fn test_datetime() -> DateTime<Utc> {
    utc(2024, 1, 15, 12, 0, 0)
}

/// Shorthand UTC timestamp constructor for assertions.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .expect("valid test date");
    Utc.from_utc_datetime(&date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_defaults() {
        let membership = create_test_membership(|_| {});
        assert_eq!(membership.status, MembershipStatus::Active);
        assert_eq!(membership.next_payment_date, None);
        assert_eq!(membership.amount, Decimal::new(2_999, 2));
    }

    #[test]
    fn test_factory_overrides() {
        let membership = create_test_membership(|m| {
            m.title = "Pro Trader".to_string();
            m.status = MembershipStatus::Paused;
        });
        assert_eq!(membership.title, "Pro Trader");
        assert_eq!(membership.status, MembershipStatus::Paused);
    }
}
