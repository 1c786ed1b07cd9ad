use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    domain::entities::transaction::Transaction,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepositPayload {
    amount: Decimal,
    #[serde(default)]
    tx_hash: Option<String>,
}

#[derive(Deserialize)]
struct WithdrawPayload {
    amount: Decimal,
    #[serde(default)]
    recipient: Option<String>,
}

#[derive(Deserialize)]
struct ProfilePayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{address}", get(get_user))
        .route("/users/{address}/profile", put(update_profile))
        .route("/users/{address}/deposit", post(deposit))
        .route("/users/{address}/withdraw", post(withdraw))
        .route("/users/{address}/transactions", get(list_transactions))
}

async fn get_user(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = app_state.account_use_cases.fetch_or_create(&address).await?;
    Ok(Json(user))
}

async fn update_profile(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
    Json(payload): Json<ProfilePayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .account_use_cases
        .update_profile(&address, payload.name, payload.email)
        .await?;
    Ok(Json(user))
}

async fn deposit(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
    Json(payload): Json<DepositPayload>,
) -> AppResult<impl IntoResponse> {
    let receipt = app_state
        .account_use_cases
        .deposit(&address, payload.amount, payload.tx_hash, Utc::now())
        .await?;
    Ok(Json(receipt))
}

async fn withdraw(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
    Json(payload): Json<WithdrawPayload>,
) -> AppResult<impl IntoResponse> {
    let receipt = app_state
        .account_use_cases
        .withdraw(&address, payload.amount, payload.recipient, Utc::now())
        .await?;
    Ok(Json(receipt))
}

async fn list_transactions(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<impl IntoResponse> {
    let transactions: Vec<Transaction> =
        app_state.account_use_cases.transactions(&address).await?;
    Ok(Json(transactions))
}
