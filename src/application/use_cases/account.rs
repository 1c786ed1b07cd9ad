//! Account-level operations: fetch-or-create, profile updates, deposits,
//! withdrawals, membership management and the read-only listings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{
        id_provider::IdProvider,
        store::{TableLock, UserStore},
    },
    domain::entities::{
        membership::{Membership, MembershipStatus},
        transaction::{Transaction, TransactionType},
        user::UserRecord,
    },
    use_cases::due_date::{CalendarEvent, upcoming_charges},
};

/// How many months ahead the renewal calendar projects.
const CALENDAR_MONTHS_AHEAD: u32 = 3;

/// Balance mutation result returned by deposits and withdrawals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReceipt {
    pub balance: Decimal,
    pub transaction: Transaction,
}

/// Payload for adding a membership to a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMembership {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    /// Day of month (1-31)
    pub charge_date: u32,
    #[serde(default)]
    pub status: MembershipStatus,
    #[serde(default)]
    pub admin: Option<String>,
    #[serde(default)]
    pub admin_address: Option<String>,
}

#[derive(Clone)]
pub struct AccountUseCases {
    users: Arc<dyn UserStore>,
    ids: Arc<dyn IdProvider>,
    table_lock: TableLock,
}

impl AccountUseCases {
    pub fn new(users: Arc<dyn UserStore>, ids: Arc<dyn IdProvider>, table_lock: TableLock) -> Self {
        Self {
            users,
            ids,
            table_lock,
        }
    }

    /// Returns the user record for `address`, creating an empty one on first
    /// contact.
    #[instrument(skip(self))]
    pub async fn fetch_or_create(&self, address: &str) -> AppResult<UserRecord> {
        let _guard = self.table_lock.lock().await;

        let mut table = self.users.read_all().await?;
        if let Some(user) = table.get(address) {
            return Ok(user.clone());
        }

        let user = UserRecord::new(address);
        table.insert(address.to_string(), user.clone());
        self.users.write_all(&table).await?;

        info!(address = %address, "new user record created");
        Ok(user)
    }

    /// Updates profile fields; only provided fields change.
    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        address: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<UserRecord> {
        let _guard = self.table_lock.lock().await;

        let mut table = self.users.read_all().await?;
        let user = table
            .entry(address.to_string())
            .or_insert_with(|| UserRecord::new(address));

        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }

        let updated = user.clone();
        self.users.write_all(&table).await?;
        Ok(updated)
    }

    /// Credits `amount` to the user's balance and records the deposit.
    #[instrument(skip(self))]
    pub async fn deposit(
        &self,
        address: &str,
        amount: Decimal,
        tx_hash: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<BalanceReceipt> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput("Invalid amount".to_string()));
        }

        let _guard = self.table_lock.lock().await;

        let mut table = self.users.read_all().await?;
        let user = table
            .entry(address.to_string())
            .or_insert_with(|| UserRecord::new(address));

        user.balance += amount;

        let mut transaction =
            Transaction::new(self.ids.next_id(), TransactionType::Deposit, amount, now);
        transaction.tx_hash = tx_hash;
        user.record_transaction(transaction.clone());

        let balance = user.balance;
        self.users.write_all(&table).await?;

        info!(address = %address, amount = %amount, balance = %balance, "deposit recorded");
        Ok(BalanceReceipt {
            balance,
            transaction,
        })
    }

    /// Debits `amount` from the user's balance and records the withdrawal.
    #[instrument(skip(self))]
    pub async fn withdraw(
        &self,
        address: &str,
        amount: Decimal,
        recipient: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<BalanceReceipt> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput("Invalid amount".to_string()));
        }

        let _guard = self.table_lock.lock().await;

        let mut table = self.users.read_all().await?;
        let user = table.get_mut(address).ok_or(AppError::NotFound)?;

        if user.balance < amount {
            return Err(AppError::InsufficientBalance {
                required: amount,
                available: user.balance,
            });
        }

        user.balance -= amount;

        let mut transaction =
            Transaction::new(self.ids.next_id(), TransactionType::Withdrawal, amount, now);
        transaction.recipient = recipient;
        user.record_transaction(transaction.clone());

        let balance = user.balance;
        self.users.write_all(&table).await?;

        info!(address = %address, amount = %amount, balance = %balance, "withdrawal recorded");
        Ok(BalanceReceipt {
            balance,
            transaction,
        })
    }

    /// Adds a membership to the user, creating the record if needed. The
    /// membership starts unscheduled: `next_payment_date` is only set by the
    /// first payment.
    #[instrument(skip(self, payload))]
    pub async fn add_membership(
        &self,
        address: &str,
        payload: NewMembership,
    ) -> AppResult<Membership> {
        if payload.amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput("Invalid amount".to_string()));
        }
        if !(1..=31).contains(&payload.charge_date) {
            return Err(AppError::InvalidInput(
                "chargeDate must be between 1 and 31".to_string(),
            ));
        }

        let _guard = self.table_lock.lock().await;

        let mut table = self.users.read_all().await?;
        let user = table
            .entry(address.to_string())
            .or_insert_with(|| UserRecord::new(address));

        let membership = Membership {
            id: self.ids.next_id(),
            title: payload.title,
            description: payload.description,
            amount: payload.amount,
            charge_date: payload.charge_date,
            status: payload.status,
            admin: payload.admin,
            admin_address: payload.admin_address,
            next_payment_date: None,
            last_paid_date: None,
            failed_payment_date: None,
        };
        user.memberships.push(membership.clone());

        self.users.write_all(&table).await?;

        info!(address = %address, title = %membership.title, "membership added");
        Ok(membership)
    }

    /// Memberships for `address`; unknown users simply have none.
    pub async fn memberships(&self, address: &str) -> AppResult<Vec<Membership>> {
        let table = self.users.read_all().await?;
        Ok(table
            .get(address)
            .map(|user| user.memberships.clone())
            .unwrap_or_default())
    }

    /// Transaction ledger for `address`, newest-first.
    pub async fn transactions(&self, address: &str) -> AppResult<Vec<Transaction>> {
        let table = self.users.read_all().await?;
        Ok(table
            .get(address)
            .map(|user| user.transactions.clone())
            .unwrap_or_default())
    }

    /// Upcoming renewal events for `address` over the next three months.
    pub async fn calendar(&self, address: &str, now: DateTime<Utc>) -> AppResult<Vec<CalendarEvent>> {
        let table = self.users.read_all().await?;
        Ok(table
            .get(address)
            .map(|user| upcoming_charges(user, now, CALENDAR_MONTHS_AHEAD))
            .unwrap_or_default())
    }
}
