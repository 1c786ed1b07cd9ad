//! Flat-file persistence: the whole user table lives in `users.json` and the
//! admin singleton in `admin.json`, both pretty-printed for hand inspection.
//!
//! Reads and writes move entire documents; there is no partial update. A
//! missing file reads as the empty/default document so a fresh data directory
//! works without seeding.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::store::{AdminStore, UserStore},
    domain::entities::{admin::AdminRecord, user::UserTable},
};

const USERS_FILE: &str = "users.json";
const ADMIN_FILE: &str = "admin.json";

pub struct JsonFileStore {
    users_path: PathBuf,
    admin_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            users_path: data_dir.join(USERS_FILE),
            admin_path: data_dir.join(ADMIN_FILE),
        }
    }

    /// Creates the data directory and seeds empty documents so later writes
    /// never race directory creation.
    pub async fn ensure_files(&self) -> AppResult<()> {
        if let Some(dir) = self.users_path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|err| AppError::Persistence(err.to_string()))?;
        }

        if !fs::try_exists(&self.users_path)
            .await
            .map_err(|err| AppError::Persistence(err.to_string()))?
        {
            self.write_all(&UserTable::new()).await?;
        }
        if !fs::try_exists(&self.admin_path)
            .await
            .map_err(|err| AppError::Persistence(err.to_string()))?
        {
            self.write_admin(&AdminRecord::default()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn read_all(&self) -> AppResult<UserTable> {
        match fs::read(&self.users_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| AppError::Persistence(format!("corrupt user table: {err}"))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(UserTable::new()),
            Err(err) => Err(AppError::Persistence(err.to_string())),
        }
    }

    async fn write_all(&self, table: &UserTable) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(table)
            .map_err(|err| AppError::Persistence(err.to_string()))?;
        fs::write(&self.users_path, bytes)
            .await
            .map_err(|err| AppError::Persistence(err.to_string()))
    }
}

#[async_trait]
impl AdminStore for JsonFileStore {
    async fn read_admin(&self) -> AppResult<AdminRecord> {
        match fs::read(&self.admin_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| AppError::Persistence(format!("corrupt admin record: {err}"))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(AdminRecord::default()),
            Err(err) => Err(AppError::Persistence(err.to_string())),
        }
    }

    async fn write_admin(&self, admin: &AdminRecord) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(admin)
            .map_err(|err| AppError::Persistence(err.to_string()))?;
        fs::write(&self.admin_path, bytes)
            .await
            .map_err(|err| AppError::Persistence(err.to_string()))
    }
}
