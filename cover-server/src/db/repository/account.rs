//! Account Repository

use super::{RepoError, RepoResult};
use shared::models::User;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, email, password_hash, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
        .bind(email.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a new account. Duplicate emails surface as [`RepoError::Duplicate`].
pub async fn create(
    pool: &SqlitePool,
    id: &str,
    email: &str,
    password_hash: &str,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(id.to_string())
        .bind(email.to_string())
        .bind(password_hash.to_string())
        .bind(now)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
