//! Admin API module
//!
//! Approval queue, ticket dashboard, and relocation. Every route requires
//! the admin role, resolved from the database per request.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/admin", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/purchase-requests/pending", get(handler::pending_requests))
        .route("/purchase-requests/{id}/approve", post(handler::approve))
        .route("/purchase-requests/{id}/reject", post(handler::reject))
        .route(
            "/purchase-requests/{id}/relocate",
            post(handler::relocate_order),
        )
        .route("/tickets", get(handler::all_tickets))
        .route("/tickets/relocate", post(handler::relocate_tickets))
        .layer(middleware::from_fn_with_state(state, require_admin))
}
