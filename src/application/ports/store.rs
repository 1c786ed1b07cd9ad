use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    app_error::AppResult,
    domain::entities::{admin::AdminRecord, user::UserTable},
};

/// Persistence port for the flat user-table document.
///
/// Reads and writes move the entire table at once; callers are expected to
/// hold the [`TableLock`] across each read-modify-write cycle.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn read_all(&self) -> AppResult<UserTable>;
    async fn write_all(&self, table: &UserTable) -> AppResult<()>;
}

/// Persistence port for the admin singleton record.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn read_admin(&self) -> AppResult<AdminRecord>;
    async fn write_admin(&self, admin: &AdminRecord) -> AppResult<()>;
}

/// Serializes whole-table read-modify-write cycles. The stores themselves are
/// plain snapshot I/O; without this guard two overlapping cycles would each
/// read a stale snapshot and the later write would discard the earlier one.
pub type TableLock = Arc<tokio::sync::Mutex<()>>;
