//! Due-date policy: pure date arithmetic driving the recurring billing engine.
//!
//! All computation is in UTC. Successive due dates land on the membership's
//! `charge_date` one calendar month after the base date, at midnight; a charge
//! day past the end of the target month clamps to the month's last day
//! (`charge_date = 31` bills January 31, February 28/29, March 31, ...).

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{
    membership::{Membership, MembershipStatus},
    user::UserRecord,
};

/// Whether the membership should be charged by the sweep at `now`.
///
/// Only active memberships with a scheduled next payment date are ever due;
/// `paused` and `payment_failed` memberships are excluded until resumed or
/// retried.
pub fn is_due(membership: &Membership, now: DateTime<Utc>) -> bool {
    membership.status == MembershipStatus::Active
        && membership
            .next_payment_date
            .is_some_and(|due| now >= due)
}

/// The due date following `base`: same charge day one calendar month later.
pub fn next_due_date(base: DateTime<Utc>, charge_day: u32) -> DateTime<Utc> {
    let (year, month) = add_months(base.year(), base.month(), 1);
    date_on_charge_day(year, month, charge_day).unwrap_or(base)
}

/// Base date for manually triggered payments.
///
/// A future `next_payment_date` is used as the base so that repeated manual
/// payments stack coverage forward; otherwise the payment anchors at `now`.
/// The automatic sweep never uses this: it always anchors on the due date it
/// just matched, so the charge-day rhythm cannot drift.
pub fn manual_charge_base(membership: &Membership, now: DateTime<Utc>) -> DateTime<Utc> {
    match membership.next_payment_date {
        Some(next) if next > now => next,
        _ => now,
    }
}

/// One projected charge in the renewal calendar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub membership_id: Uuid,
    pub status: MembershipStatus,
    pub charge_date: u32,
}

/// Projects each membership's charge day across the next `months` months,
/// future dates only, sorted ascending. Read-only consumer of the policy;
/// never touches billing state.
pub fn upcoming_charges(user: &UserRecord, now: DateTime<Utc>, months: u32) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for membership in &user.memberships {
        for offset in 0..months {
            let (year, month) = add_months(now.year(), now.month(), offset);
            let Some(date) = date_on_charge_day(year, month, membership.charge_date) else {
                continue;
            };
            if date >= now {
                events.push(CalendarEvent {
                    id: format!("{}-{}", membership.id, offset),
                    title: membership.title.clone(),
                    description: format!(
                        "{} - monthly charge on day {}",
                        membership.title, membership.charge_date
                    ),
                    date,
                    amount: membership.amount,
                    membership_id: membership.id,
                    status: membership.status,
                    charge_date: membership.charge_date,
                });
            }
        }
    }

    events.sort_by_key(|event| event.date);
    events
}

fn add_months(year: i32, month: u32, count: u32) -> (i32, u32) {
    let zero_based = (month - 1) + count;
    (year + (zero_based / 12) as i32, zero_based % 12 + 1)
}

/// Midnight UTC on `charge_day` of the given month, clamped into the month.
/// Returns `None` only for degenerate year/month inputs out of chrono's range.
fn date_on_charge_day(year: i32, month: u32, charge_day: u32) -> Option<DateTime<Utc>> {
    let day = charge_day.clamp(1, days_in_month(year, month));
    let date = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&date))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
    }
}
