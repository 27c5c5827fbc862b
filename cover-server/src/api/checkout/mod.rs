//! Checkout API module (card flow)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/checkout/session", post(handler::create_session))
        .route("/api/checkout/verify", get(handler::verify_session))
}
