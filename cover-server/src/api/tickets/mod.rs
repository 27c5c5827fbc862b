//! Tickets API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/tickets/mine", get(handler::list_mine))
        .route("/api/tickets/{id}/wallet", get(handler::wallet_pass))
}
