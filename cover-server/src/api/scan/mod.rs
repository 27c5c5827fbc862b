//! Scan API module (door staff)

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/api/scan", post(handler::scan))
        .layer(middleware::from_fn_with_state(state, require_admin))
}
