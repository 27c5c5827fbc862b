//! Purchases API module (transfer flow)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/purchases", post(handler::create))
        .route("/api/purchases/mine", get(handler::list_mine))
}
