//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - register / login
//! - [`purchases`] - transfer-flow checkout and own-request listing
//! - [`checkout`] - card-flow checkout session + verification
//! - [`tables`] - public table counts and the occupancy map
//! - [`tickets`] - own tickets and wallet passes
//! - [`scan`] - door QR validation (admin)
//! - [`admin`] - approval queue, ticket dashboard, relocation (admin)

pub mod admin;
pub mod auth;
pub mod checkout;
pub mod health;
pub mod purchases;
pub mod scan;
pub mod tables;
pub mod tickets;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(purchases::router())
        .merge(checkout::router())
        .merge(tables::router())
        .merge(tickets::router())
        .merge(scan::router(state.clone()))
        .merge(admin::router(state.clone()))
        .nest_service(
            "/uploads",
            ServeDir::new(state.storage.uploads_dir().clone()),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
