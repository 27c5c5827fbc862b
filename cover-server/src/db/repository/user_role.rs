//! User Role Repository
//!
//! Only the role resolver reads this table; everything else sees the
//! narrow `is_admin` capability it exposes.

use super::RepoResult;
use sqlx::SqlitePool;

/// Role name for a user, None when no role row exists
pub async fn find_role(pool: &SqlitePool, user_id: &str) -> RepoResult<Option<String>> {
    let role = sqlx::query_scalar::<_, String>("SELECT role FROM user_roles WHERE user_id = ?")
        .bind(user_id.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(role)
}

/// Notification email recorded for a user at registration
pub async fn email_for_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Option<String>> {
    let email =
        sqlx::query_scalar::<_, Option<String>>("SELECT email FROM user_roles WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(pool)
            .await?;
    Ok(email.flatten())
}

/// Create or update the role row for a user
pub async fn upsert(
    pool: &SqlitePool,
    user_id: &str,
    role: &str,
    email: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO user_roles (user_id, role, email, created_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(user_id) DO UPDATE SET role = ?2, email = ?3",
    )
    .bind(user_id.to_string())
    .bind(role.to_string())
    .bind(email.map(|e| e.to_string()))
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}
