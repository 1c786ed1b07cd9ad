use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    use_cases::account::NewMembership,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{address}/memberships",
            get(list_memberships).post(add_membership),
        )
        .route("/users/{address}/memberships/{id}/pay", post(pay_membership))
        .route(
            "/users/{address}/memberships/{id}/retry",
            post(retry_payment),
        )
        .route("/users/{address}/calendar", get(calendar))
}

async fn list_memberships(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<impl IntoResponse> {
    let memberships = app_state.account_use_cases.memberships(&address).await?;
    Ok(Json(memberships))
}

async fn add_membership(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
    Json(payload): Json<NewMembership>,
) -> AppResult<impl IntoResponse> {
    let membership = app_state
        .account_use_cases
        .add_membership(&address, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

async fn pay_membership(
    State(app_state): State<AppState>,
    Path((address, id)): Path<(String, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let receipt = app_state
        .billing_use_cases
        .pay_membership(&address, id, Utc::now())
        .await?;
    Ok(Json(receipt))
}

async fn retry_payment(
    State(app_state): State<AppState>,
    Path((address, id)): Path<(String, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let receipt = app_state
        .billing_use_cases
        .retry_payment(&address, id, Utc::now())
        .await?;
    Ok(Json(receipt))
}

async fn calendar(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
) -> AppResult<impl IntoResponse> {
    let events = app_state
        .account_use_cases
        .calendar(&address, Utc::now())
        .await?;
    Ok(Json(events))
}
