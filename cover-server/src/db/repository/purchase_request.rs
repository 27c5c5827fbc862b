//! Purchase Request Repository
//!
//! Rows are created by the two checkout flows and mutated only by the
//! approval workflow. Requests are never deleted.

use super::{RepoError, RepoResult};
use rand::Rng;
use shared::models::{PurchaseRequest, PurchaseRequestCreate, PurchaseStatus};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, checkout_session_id, user_id, table_id, quantity, names, total_price, proof_of_payment_url, reference, payment_method, status, created_at, updated_at";

/// Generate a human-facing 5-digit transfer reference
pub fn generate_reference() -> String {
    rand::thread_rng().gen_range(10000..100000).to_string()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PurchaseRequest>> {
    let request = sqlx::query_as::<_, PurchaseRequest>(&format!(
        "SELECT {COLUMNS} FROM purchase_requests WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(request)
}

/// Find a request by provider checkout session id (card flow idempotency)
pub async fn find_by_session(
    pool: &SqlitePool,
    session_id: &str,
) -> RepoResult<Option<PurchaseRequest>> {
    let request = sqlx::query_as::<_, PurchaseRequest>(&format!(
        "SELECT {COLUMNS} FROM purchase_requests WHERE checkout_session_id = ?"
    ))
    .bind(session_id.to_string())
    .fetch_optional(pool)
    .await?;
    Ok(request)
}

/// All pending requests, newest first (admin review queue)
pub async fn find_pending(pool: &SqlitePool) -> RepoResult<Vec<PurchaseRequest>> {
    let requests = sqlx::query_as::<_, PurchaseRequest>(&format!(
        "SELECT {COLUMNS} FROM purchase_requests WHERE status = 'pending' ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(requests)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<PurchaseRequest>> {
    let requests = sqlx::query_as::<_, PurchaseRequest>(&format!(
        "SELECT {COLUMNS} FROM purchase_requests WHERE user_id = ? ORDER BY created_at DESC"
    ))
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;
    Ok(requests)
}

/// Current status of a request, None when the id does not exist.
///
/// Used to tell "not found" from "already processed" after a conditional
/// update matched zero rows.
pub async fn status_of(pool: &SqlitePool, id: i64) -> RepoResult<Option<PurchaseStatus>> {
    let status = sqlx::query_scalar::<_, PurchaseStatus>(
        "SELECT status FROM purchase_requests WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(status)
}

/// Insert a new request with `status = 'pending'`
pub async fn create(pool: &SqlitePool, data: PurchaseRequestCreate) -> RepoResult<PurchaseRequest> {
    let now = shared::util::now_millis();
    let names_json = serde_json::to_string(&data.names)
        .map_err(|e| RepoError::Validation(format!("Invalid names: {e}")))?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO purchase_requests (checkout_session_id, user_id, table_id, quantity, names, total_price, proof_of_payment_url, reference, payment_method, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', ?10, ?10) RETURNING id",
    )
    .bind(data.checkout_session_id.clone())
    .bind(data.user_id.clone())
    .bind(data.table_id.clone())
    .bind(data.quantity)
    .bind(names_json)
    .bind(data.total_price)
    .bind(data.proof_of_payment_url.clone())
    .bind(data.reference.clone())
    .bind(data.payment_method)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create purchase request".into()))
}

/// Insert a new request, silently regenerating the reference exactly once
/// if it collides with an existing row.
///
/// A second collision (or a collision on any other unique column, such as
/// the checkout session id) surfaces to the caller.
pub async fn create_with_reference_retry(
    pool: &SqlitePool,
    mut data: PurchaseRequestCreate,
) -> RepoResult<PurchaseRequest> {
    match create(pool, data.clone()).await {
        Err(RepoError::Duplicate(msg)) if msg.contains("reference") => {
            tracing::warn!(
                reference = %data.reference,
                "Transfer reference collided, regenerating"
            );
            data.reference = generate_reference();
            create(pool, data).await
        }
        other => other,
    }
}

/// Conditional transition `pending → approved`, returning the updated row.
///
/// None means the guard matched nothing: the request is missing or was
/// already processed (the caller reads the status to tell them apart).
/// Runs on the approval transaction so the ticket batch insert commits
/// (or aborts) together with the status flip.
pub async fn mark_approved(
    conn: &mut SqliteConnection,
    id: i64,
    now: i64,
) -> RepoResult<Option<PurchaseRequest>> {
    let request = sqlx::query_as::<_, PurchaseRequest>(&format!(
        "UPDATE purchase_requests SET status = 'approved', updated_at = ?1 WHERE id = ?2 AND status = 'pending' RETURNING {COLUMNS}"
    ))
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(request)
}

/// Conditional transition `pending → rejected`. No side effects.
pub async fn mark_rejected(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE purchase_requests SET status = 'rejected', updated_at = ?1 WHERE id = ?2 AND status = 'pending'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
