//! Account Models

use serde::{Deserialize, Serialize};

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    /// UUID string
    pub id: String,
    pub email: String,
    /// Argon2 hash, never serialized out
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: i64,
}
