use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
mod remap;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
