use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{http::app_state::AppState, persistence::JsonFileStore},
    application::ports::{
        id_provider::{IdProvider, UuidProvider},
        store::{AdminStore, TableLock, UserStore},
    },
    infra::config::AppConfig,
    use_cases::{account::AccountUseCases, billing::BillingUseCases},
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let store = Arc::new(JsonFileStore::new(&config.data_dir));
    store.ensure_files().await?;

    // One lock guards every read-modify-write cycle against the flat file.
    let table_lock = TableLock::default();
    let ids: Arc<dyn IdProvider> = Arc::new(UuidProvider);

    let account_use_cases = AccountUseCases::new(
        store.clone() as Arc<dyn UserStore>,
        ids.clone(),
        table_lock.clone(),
    );
    let billing_use_cases = BillingUseCases::new(
        store.clone() as Arc<dyn UserStore>,
        store as Arc<dyn AdminStore>,
        ids,
        table_lock,
    );

    Ok(AppState {
        config: Arc::new(config),
        account_use_cases: Arc::new(account_use_cases),
        billing_use_cases: Arc::new(billing_use_cases),
    })
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "paypulse=debug,tower_http=debug".into());

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .ok();
}
