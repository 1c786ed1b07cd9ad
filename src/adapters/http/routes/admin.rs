use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

#[derive(Deserialize)]
struct AdminConfigPayload {
    name: String,
    address: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/config", get(get_config).put(update_config))
        .route("/admin/process-payments", post(process_payments))
}

async fn get_config(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let admin = app_state.billing_use_cases.admin_config().await?;
    Ok(Json(admin))
}

async fn update_config(
    State(app_state): State<AppState>,
    Json(payload): Json<AdminConfigPayload>,
) -> AppResult<impl IntoResponse> {
    let admin = app_state
        .billing_use_cases
        .update_admin_config(&payload.name, &payload.address)
        .await?;
    Ok(Json(admin))
}

/// Manual trigger for the automatic billing sweep, mainly for operators and
/// tests; runs the identical sweep synchronously.
async fn process_payments(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = app_state.billing_use_cases.sweep_all(Utc::now()).await?;
    Ok(Json(summary))
}
