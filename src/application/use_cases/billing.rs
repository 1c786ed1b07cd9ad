//! The recurring billing engine: payment executor, admin credit sink and the
//! sweep that drives both.
//!
//! Every table mutation here happens on one in-memory snapshot under the
//! shared [`TableLock`], and is persisted with a single `write_all` per
//! operation (the sweep writes once at the end, not per charge). The admin
//! singleton mirror is the exception: it is a separate store write performed
//! after the debit has been committed, so a crash between the two leaves the
//! mirror behind the authoritative per-admin user record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{
        id_provider::IdProvider,
        store::{AdminStore, TableLock, UserStore},
    },
    domain::entities::{
        admin::AdminRecord,
        membership::{Membership, MembershipStatus},
        transaction::{Transaction, TransactionStatus, TransactionType},
        user::{UserRecord, UserTable},
    },
    use_cases::due_date::{is_due, manual_charge_base, next_due_date},
};

const INSUFFICIENT_BALANCE_REASON: &str = "Insufficient balance";

/// Origin of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeTrigger {
    /// Scheduler sweep; balance failures are recorded, not raised
    Automatic,
    /// User-initiated "pay now"
    Manual,
    /// User-initiated recovery from `payment_failed`
    Retry,
}

/// Result of a successful charge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeReceipt {
    pub balance: Decimal,
    pub transaction: Transaction,
    pub membership: Membership,
}

/// Outcome of one charge attempt. `Failed` is only produced on the automatic
/// path, where an insufficient balance becomes a recorded ledger entry and a
/// `payment_failed` transition instead of an error.
#[derive(Debug, Clone)]
pub enum ChargeOutcome {
    Charged(ChargeReceipt),
    Failed { transaction: Transaction },
}

/// Per-sweep counters, returned for logging and the manual trigger response.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub processed: u32,
    pub failed: u32,
}

impl SweepSummary {
    pub fn attempted(&self) -> u32 {
        self.processed + self.failed
    }
}

/// Attempts one membership charge against the user's balance.
///
/// On success: debits the balance, prepends the ledger entry, stamps
/// `last_paid_date`, clears any failure marker, recovers `payment_failed`
/// to `active`, and advances `next_payment_date`. The automatic path anchors
/// the next date on the due date it matched; manual and retry anchor on
/// [`manual_charge_base`], which lets users pay ahead.
///
/// Crediting the recipient is the caller's job (see [`credit_admin`]); this
/// function only touches the payer's record.
pub fn attempt_charge(
    user: &mut UserRecord,
    membership_id: Uuid,
    now: DateTime<Utc>,
    trigger: ChargeTrigger,
    ids: &dyn IdProvider,
) -> AppResult<ChargeOutcome> {
    let index = user
        .memberships
        .iter()
        .position(|m| m.id == membership_id)
        .ok_or(AppError::NotFound)?;

    if trigger == ChargeTrigger::Retry
        && user.memberships[index].status != MembershipStatus::PaymentFailed
    {
        return Err(AppError::InvalidState);
    }

    let amount = user.memberships[index].amount;

    if user.balance < amount {
        if trigger != ChargeTrigger::Automatic {
            return Err(AppError::InsufficientBalance {
                required: amount,
                available: user.balance,
            });
        }

        let membership = &mut user.memberships[index];
        let mut transaction = Transaction::new(
            ids.next_id(),
            TransactionType::MembershipPayment,
            amount,
            now,
        );
        transaction.status = TransactionStatus::Failed;
        transaction.membership_id = Some(membership.id);
        transaction.membership_title = Some(membership.title.clone());
        transaction.reason = Some(INSUFFICIENT_BALANCE_REASON.to_string());
        transaction.automatic = true;

        membership.status = MembershipStatus::PaymentFailed;
        membership.failed_payment_date = Some(now);

        user.record_transaction(transaction.clone());
        return Ok(ChargeOutcome::Failed { transaction });
    }

    user.balance -= amount;

    let membership = &mut user.memberships[index];
    let mut transaction = Transaction::new(
        ids.next_id(),
        TransactionType::MembershipPayment,
        amount,
        now,
    );
    transaction.membership_id = Some(membership.id);
    transaction.membership_title = Some(membership.title.clone());
    transaction.automatic = trigger == ChargeTrigger::Automatic;
    transaction.retried = trigger == ChargeTrigger::Retry;

    // The sweep only charges memberships whose due date matched, so the
    // anchor is always present on the automatic path.
    let base = match trigger {
        ChargeTrigger::Automatic => membership.next_payment_date.unwrap_or(now),
        ChargeTrigger::Manual | ChargeTrigger::Retry => manual_charge_base(membership, now),
    };

    membership.last_paid_date = Some(now);
    membership.failed_payment_date = None;
    if membership.status == MembershipStatus::PaymentFailed {
        membership.status = MembershipStatus::Active;
    }
    membership.next_payment_date = Some(next_due_date(base, membership.charge_date));

    let receipt = ChargeReceipt {
        balance: user.balance,
        transaction: transaction.clone(),
        membership: membership.clone(),
    };
    user.record_transaction(transaction);

    Ok(ChargeOutcome::Charged(receipt))
}

/// Outcome of routing a charge to the recipient account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditOutcome {
    Credited { admin_address: String },
    /// Membership has no `admin_address`; not an error
    Skipped,
}

/// Routes a successful charge's funds to the membership's admin account,
/// upserting the admin's own `UserRecord` in the same table snapshot the
/// caller will persist.
pub fn credit_admin(
    table: &mut UserTable,
    amount: Decimal,
    membership: &Membership,
    payer_address: &str,
    now: DateTime<Utc>,
    ids: &dyn IdProvider,
) -> CreditOutcome {
    let Some(admin_address) = membership.admin_address.clone() else {
        return CreditOutcome::Skipped;
    };

    let admin_user = table.entry(admin_address.clone()).or_insert_with(|| {
        let mut user = UserRecord::new(admin_address.clone());
        user.name = membership
            .admin
            .clone()
            .unwrap_or_else(|| "Admin".to_string());
        user
    });

    admin_user.balance += amount;

    let mut transaction =
        Transaction::new(ids.next_id(), TransactionType::PaymentReceived, amount, now);
    transaction.from = Some(payer_address.to_string());
    transaction.membership_title = Some(membership.title.clone());
    admin_user.record_transaction(transaction);

    CreditOutcome::Credited { admin_address }
}

#[derive(Clone)]
pub struct BillingUseCases {
    users: Arc<dyn UserStore>,
    admin: Arc<dyn AdminStore>,
    ids: Arc<dyn IdProvider>,
    table_lock: TableLock,
}

impl BillingUseCases {
    pub fn new(
        users: Arc<dyn UserStore>,
        admin: Arc<dyn AdminStore>,
        ids: Arc<dyn IdProvider>,
        table_lock: TableLock,
    ) -> Self {
        Self {
            users,
            admin,
            ids,
            table_lock,
        }
    }

    /// User-initiated "pay now" for one membership.
    #[instrument(skip(self))]
    pub async fn pay_membership(
        &self,
        address: &str,
        membership_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<ChargeReceipt> {
        self.charge_and_persist(address, membership_id, now, ChargeTrigger::Manual)
            .await
    }

    /// User-initiated recovery of a `payment_failed` membership.
    #[instrument(skip(self))]
    pub async fn retry_payment(
        &self,
        address: &str,
        membership_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<ChargeReceipt> {
        self.charge_and_persist(address, membership_id, now, ChargeTrigger::Retry)
            .await
    }

    async fn charge_and_persist(
        &self,
        address: &str,
        membership_id: Uuid,
        now: DateTime<Utc>,
        trigger: ChargeTrigger,
    ) -> AppResult<ChargeReceipt> {
        let _guard = self.table_lock.lock().await;

        let mut table = self.users.read_all().await?;
        let user = table.get_mut(address).ok_or(AppError::NotFound)?;

        let receipt = match attempt_charge(user, membership_id, now, trigger, self.ids.as_ref())? {
            ChargeOutcome::Charged(receipt) => receipt,
            // Only the automatic trigger converts balance failures into
            // recorded outcomes.
            ChargeOutcome::Failed { .. } => {
                return Err(AppError::Internal(
                    "non-automatic charge recorded a failure".to_string(),
                ));
            }
        };

        let credited = credit_admin(
            &mut table,
            receipt.transaction.amount,
            &receipt.membership,
            address,
            now,
            self.ids.as_ref(),
        );

        self.users.write_all(&table).await?;

        if let CreditOutcome::Credited { admin_address } = credited {
            info!(
                amount = %receipt.transaction.amount,
                admin = %admin_address,
                "membership payment credited"
            );
            self.mirror_admin_credit(receipt.transaction.amount).await;
        }

        Ok(receipt)
    }

    /// One full pass over all users and memberships, charging everything due.
    ///
    /// Balance failures are per-membership and never abort the sweep. The
    /// mutated table is persisted exactly once at the end, and only if at
    /// least one charge was attempted.
    #[instrument(skip(self))]
    pub async fn sweep_all(&self, now: DateTime<Utc>) -> AppResult<SweepSummary> {
        let _guard = self.table_lock.lock().await;

        let mut table = self.users.read_all().await?;
        let mut summary = SweepSummary::default();
        let mut mirror_credit = Decimal::ZERO;

        let addresses: Vec<String> = table.keys().cloned().collect();
        for address in addresses {
            let due: Vec<Uuid> = match table.get(&address) {
                Some(user) => user
                    .memberships
                    .iter()
                    .filter(|m| is_due(m, now))
                    .map(|m| m.id)
                    .collect(),
                None => continue,
            };

            for membership_id in due {
                let Some(user) = table.get_mut(&address) else {
                    break;
                };
                match attempt_charge(
                    user,
                    membership_id,
                    now,
                    ChargeTrigger::Automatic,
                    self.ids.as_ref(),
                )? {
                    ChargeOutcome::Charged(receipt) => {
                        summary.processed += 1;
                        info!(
                            address = %address,
                            membership = %receipt.membership.title,
                            amount = %receipt.transaction.amount,
                            balance = %receipt.balance,
                            "automatic payment processed"
                        );
                        let credited = credit_admin(
                            &mut table,
                            receipt.transaction.amount,
                            &receipt.membership,
                            &address,
                            now,
                            self.ids.as_ref(),
                        );
                        if matches!(credited, CreditOutcome::Credited { .. }) {
                            mirror_credit += receipt.transaction.amount;
                        }
                    }
                    ChargeOutcome::Failed { transaction } => {
                        summary.failed += 1;
                        warn!(
                            address = %address,
                            amount = %transaction.amount,
                            "automatic payment failed"
                        );
                    }
                }
            }
        }

        if summary.attempted() > 0 {
            self.users.write_all(&table).await?;
        }

        if mirror_credit > Decimal::ZERO {
            self.mirror_admin_credit(mirror_credit).await;
        }

        Ok(summary)
    }

    /// Current admin singleton configuration.
    pub async fn admin_config(&self) -> AppResult<AdminRecord> {
        self.admin.read_admin().await
    }

    /// Updates the operator name and receiving address; marks the singleton
    /// configured so subsequent charges mirror into its balance.
    #[instrument(skip(self))]
    pub async fn update_admin_config(&self, name: &str, address: &str) -> AppResult<AdminRecord> {
        if name.trim().is_empty() || address.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Name and address are required".to_string(),
            ));
        }

        let mut admin = self.admin.read_admin().await?;
        admin.name = name.to_string();
        admin.address = address.to_string();
        admin.configured = true;
        self.admin.write_admin(&admin).await?;

        info!(name = %admin.name, address = %admin.address, "admin configuration updated");
        Ok(admin)
    }

    /// Best-effort update of the informational admin balance mirror. Failures
    /// are logged and never unwind the already-persisted debit.
    async fn mirror_admin_credit(&self, amount: Decimal) {
        match self.admin.read_admin().await {
            Ok(mut admin) if admin.configured => {
                admin.balance += amount;
                if let Err(err) = self.admin.write_admin(&admin).await {
                    warn!(error = %err, "failed to update admin balance mirror");
                }
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "failed to read admin balance mirror");
            }
        }
    }
}
