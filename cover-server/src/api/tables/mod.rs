//! Tables API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/tables/counts", get(handler::counts))
        .route("/api/tables/occupancy", get(handler::occupancy_map))
}
