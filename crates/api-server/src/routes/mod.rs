//! Route handlers

pub mod health;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// All API routes, state attached
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(task::router())
        .with_state(state)
}
