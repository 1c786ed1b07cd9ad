use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{account::AccountUseCases, billing::BillingUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub account_use_cases: Arc<AccountUseCases>,
    pub billing_use_cases: Arc<BillingUseCases>,
}
