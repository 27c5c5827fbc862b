//! Data models
//!
//! Shared between cover-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod account;
pub mod occupancy;
pub mod purchase_request;
pub mod ticket;

// Re-exports
pub use account::*;
pub use occupancy::*;
pub use purchase_request::*;
pub use ticket::*;
