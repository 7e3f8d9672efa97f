//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{delete, get, post};

/// Build the application router. Middleware is layered on by the caller.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/healthz", get(handlers::health))
        .route("/token", get(handlers::token))
        .route("/rooms/{room}", delete(handlers::delete_room_path))
        .route("/delete-room", post(handlers::delete_room_query))
        .route("/aqi", get(handlers::air_quality))
        .with_state(state)
}
