use crate::state::AppState;
use axum::routing::get;
use axum::Router;

mod dto;
pub mod handlers;
mod middleware;

pub use middleware::require_login;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/login",
        get(handlers::login_page).post(handlers::login_submit),
    )
}
