//! Shared fixtures for repository and workflow tests
//!
//! Tests run against an in-memory SQLite pool with the real migrations
//! applied, so schema drift between migrations and queries fails loudly.

use shared::models::{PaymentMethod, PurchaseRequestCreate};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// In-memory pool with the full schema.
///
/// A single connection keeps every query on the same in-memory database;
/// concurrent callers are serialized by the pool, which still exercises
/// the conditional-update guards.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// Insert an account plus its role row
pub async fn seed_user(pool: &SqlitePool, id: &str, email: &str, role: &str) {
    super::repository::account::create(pool, id, email, "$argon2id$test").await.unwrap();
    super::repository::user_role::upsert(pool, id, role, Some(email)).await.unwrap();
}

/// Transfer-flow create payload with a fresh random reference
pub fn request_create(user_id: &str, names: &[&str]) -> PurchaseRequestCreate {
    PurchaseRequestCreate {
        user_id: user_id.to_string(),
        table_id: Some("mesa-32".to_string()),
        quantity: names.len() as i64,
        names: names.iter().map(|s| s.to_string()).collect(),
        total_price: names.len() as f64 * 500.0,
        proof_of_payment_url: Some("/uploads/payment-proofs/test.jpg".to_string()),
        reference: super::repository::purchase_request::generate_reference(),
        payment_method: PaymentMethod::Transfer,
        checkout_session_id: None,
    }
}
