//! Identity & Role Resolver
//!
//! The only component that reads the `user_roles` table. The resolver runs
//! its reads over the server's own pool, an elevated handle that per-user
//! ownership policy does not constrain, and exposes nothing wider than
//! `is_admin` and the notification email lookup.

use crate::db::repository::{RepoResult, user_role};
use sqlx::SqlitePool;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

#[derive(Clone)]
pub struct RoleResolver {
    pool: SqlitePool,
}

impl RoleResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Whether the user holds the admin role.
    ///
    /// Resolved against the database on every call so a revoked role takes
    /// effect immediately, regardless of outstanding tokens.
    pub async fn is_admin(&self, user_id: &str) -> RepoResult<bool> {
        let role = user_role::find_role(&self.pool, user_id).await?;
        Ok(role.as_deref() == Some(ROLE_ADMIN))
    }

    /// Notification email recorded for the user at registration
    pub async fn email_for_user(&self, user_id: &str) -> RepoResult<Option<String>> {
        user_role::email_for_user(&self.pool, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{seed_user, test_pool};

    #[tokio::test]
    async fn test_is_admin() {
        let pool = test_pool().await;
        seed_user(&pool, "admin-1", "admin@example.com", ROLE_ADMIN).await;
        seed_user(&pool, "user-1", "ana@example.com", ROLE_USER).await;

        let resolver = RoleResolver::new(pool);
        assert!(resolver.is_admin("admin-1").await.unwrap());
        assert!(!resolver.is_admin("user-1").await.unwrap());
        // Unknown users have no role row at all
        assert!(!resolver.is_admin("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_email_lookup() {
        let pool = test_pool().await;
        seed_user(&pool, "user-1", "ana@example.com", ROLE_USER).await;

        let resolver = RoleResolver::new(pool);
        assert_eq!(
            resolver.email_for_user("user-1").await.unwrap().as_deref(),
            Some("ana@example.com")
        );
        assert_eq!(resolver.email_for_user("ghost").await.unwrap(), None);
    }
}
