//! Cover Server - storefront and admin backend for event cover sales
//!
//! # Architecture overview
//!
//! - **Purchases** (`api/purchases`, `api/checkout`): bank-transfer and
//!   card checkout flows producing pending purchase requests
//! - **Approval** (`approval`): the admin state machine turning pending
//!   requests into issued tickets, or rejecting them
//! - **Tickets** (`tickets`): QR issuance, door redemption, relocation
//! - **Occupancy** (`occupancy`): live per-table cover counts
//! - **Auth** (`auth`): JWT + Argon2, database-resolved admin role
//! - **Database** (`db`): embedded SQLite via sqlx
//!
//! # Module structure
//!
//! ```text
//! cover-server/src/
//! ├── core/          # config, event data, state, server
//! ├── auth/          # JWT, passwords, role resolver, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # pool, migrations, repositories
//! ├── approval/      # purchase request state machine
//! ├── tickets/       # issuance, redemption, relocation, QR tokens
//! ├── occupancy/     # derived table counts
//! ├── services/      # payments, email, storage, wallet
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod approval;
pub mod auth;
pub mod core;
pub mod db;
pub mod occupancy;
pub mod services;
pub mod tickets;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, EventConfig, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);
}
