//! Shared types for the cover storefront
//!
//! Data models and small utilities used by both the server and any
//! API consumers. Row types derive `sqlx::FromRow` behind the `db`
//! feature so frontends can depend on this crate without pulling in
//! the database stack.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
