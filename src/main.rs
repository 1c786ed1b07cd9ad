use dotenvy::dotenv;
use tracing::info;

use paypulse::infra::{
    app::create_app, billing_scheduler::run_billing_sweep_loop, setup::init_app_state,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let app_state = init_app_state().await?;

    let bind_addr = app_state.config.bind_addr;
    let sweep_interval = app_state.config.sweep_interval;

    let app = create_app(app_state.clone());

    // Spawn the automatic billing sweep (after tracing is initialized)
    let billing_use_cases = app_state.billing_use_cases.clone();
    tokio::spawn(async move {
        run_billing_sweep_loop(billing_use_cases, sweep_interval).await;
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
