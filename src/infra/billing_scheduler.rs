//! Drives the automatic billing sweep: one run immediately at startup, then
//! on a fixed wall-clock interval. The same sweep is reachable on demand via
//! the admin process-payments endpoint.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::use_cases::billing::BillingUseCases;

pub async fn run_billing_sweep_loop(billing_uc: Arc<BillingUseCases>, every: Duration) {
    // The first tick completes immediately, which gives us the startup sweep.
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        interval_secs = every.as_secs(),
        "billing sweep loop started"
    );

    loop {
        ticker.tick().await;
        match billing_uc.sweep_all(Utc::now()).await {
            Ok(summary) if summary.attempted() > 0 => {
                info!(
                    processed = summary.processed,
                    failed = summary.failed,
                    "billing sweep complete"
                );
            }
            Ok(_) => {
                debug!("no payments due");
            }
            // The next tick retries the whole sweep; nothing to unwind here.
            Err(err) => {
                error!(error = %err, "billing sweep failed");
            }
        }
    }
}
