use crate::state::AppState;
use axum::Router;

mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod session;
pub mod user;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
