//! In-memory mock implementations of the persistence ports.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{
        id_provider::IdProvider,
        store::{AdminStore, UserStore},
    },
    domain::entities::{
        admin::AdminRecord,
        user::{UserRecord, UserTable},
    },
};

/// In-memory user table + admin singleton with failure injection and a
/// write counter for persisted-exactly-once assertions.
#[derive(Default)]
pub struct InMemoryStore {
    pub users: Mutex<UserTable>,
    pub admin: Mutex<AdminRecord>,
    pub user_writes: AtomicUsize,
    pub fail_user_reads: AtomicBool,
    pub fail_user_writes: AtomicBool,
    pub fail_admin_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        let table: UserTable = users
            .into_iter()
            .map(|user| (user.address.clone(), user))
            .collect();
        Self {
            users: Mutex::new(table),
            ..Self::default()
        }
    }

    /// Snapshot of one user record; panics if the user does not exist.
    pub fn user(&self, address: &str) -> UserRecord {
        self.users
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or_else(|| panic!("no user record for {address}"))
    }

    pub fn set_admin(&self, overrides: impl FnOnce(&mut AdminRecord)) {
        overrides(&mut self.admin.lock().unwrap());
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn read_all(&self) -> AppResult<UserTable> {
        if self.fail_user_reads.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("injected read failure".to_string()));
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn write_all(&self, table: &UserTable) -> AppResult<()> {
        if self.fail_user_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("injected write failure".to_string()));
        }
        self.user_writes.fetch_add(1, Ordering::SeqCst);
        *self.users.lock().unwrap() = table.clone();
        Ok(())
    }
}

#[async_trait]
impl AdminStore for InMemoryStore {
    async fn read_admin(&self) -> AppResult<AdminRecord> {
        Ok(self.admin.lock().unwrap().clone())
    }

    async fn write_admin(&self, admin: &AdminRecord) -> AppResult<()> {
        if self.fail_admin_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("injected write failure".to_string()));
        }
        *self.admin.lock().unwrap() = admin.clone();
        Ok(())
    }
}

/// Deterministic id provider: 1, 2, 3, ... as UUIDs.
#[derive(Default)]
pub struct SequentialIdProvider {
    counter: AtomicU64,
}

impl IdProvider for SequentialIdProvider {
    fn next_id(&self) -> Uuid {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Uuid::from_u128(n as u128)
    }
}
