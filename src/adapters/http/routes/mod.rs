use axum::Router;

use crate::adapters::http::app_state::AppState;

pub mod admin;
pub mod memberships;
pub mod users;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(memberships::router())
        .merge(admin::router())
}
