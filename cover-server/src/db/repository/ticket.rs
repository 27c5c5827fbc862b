//! Ticket Repository
//!
//! Tickets are created in bulk by the issuance engine and mutated only by
//! redemption (status/scan fields) and relocation (table id). Never deleted.

use super::RepoResult;
use shared::models::{Ticket, TicketCreate};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, purchase_request_id, user_id, qr_code, cover_name, table_id, status, scanned_at, scanned_by, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Ticket>> {
    let ticket =
        sqlx::query_as::<_, Ticket>(&format!("SELECT {COLUMNS} FROM tickets WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(ticket)
}

/// Exact QR code match; the code is the capability, no fuzzy lookup
pub async fn find_by_qr(pool: &SqlitePool, qr_code: &str) -> RepoResult<Option<Ticket>> {
    let ticket =
        sqlx::query_as::<_, Ticket>(&format!("SELECT {COLUMNS} FROM tickets WHERE qr_code = ?"))
            .bind(qr_code.to_string())
            .fetch_optional(pool)
            .await?;
    Ok(ticket)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<Ticket>> {
    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {COLUMNS} FROM tickets WHERE user_id = ? ORDER BY created_at DESC"
    ))
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;
    Ok(tickets)
}

/// All tickets, newest first (admin dashboard)
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Ticket>> {
    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {COLUMNS} FROM tickets ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(tickets)
}

pub async fn find_by_purchase_request(
    pool: &SqlitePool,
    purchase_request_id: i64,
) -> RepoResult<Vec<Ticket>> {
    let tickets = sqlx::query_as::<_, Ticket>(&format!(
        "SELECT {COLUMNS} FROM tickets WHERE purchase_request_id = ? ORDER BY id"
    ))
    .bind(purchase_request_id)
    .fetch_all(pool)
    .await?;
    Ok(tickets)
}

/// Insert one ticket with `status = 'approved'` on the caller's transaction.
///
/// The issuance engine calls this once per attendee name inside the
/// approval transaction, so a failed insert aborts the whole batch.
pub async fn insert_approved(
    conn: &mut SqliteConnection,
    data: &TicketCreate,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO tickets (purchase_request_id, user_id, qr_code, cover_name, table_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'approved', ?6, ?6) RETURNING id",
    )
    .bind(data.purchase_request_id)
    .bind(data.user_id.clone())
    .bind(data.qr_code.clone())
    .bind(data.cover_name.clone())
    .bind(data.table_id.clone())
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Conditional transition `approved → used`, recording scan time and scanner.
///
/// Returns affected rows; 0 means the code is unknown or the ticket was not
/// in `approved`; the caller re-reads the row to tell those apart. This is
/// the sole redemption path: a read-then-write would race under two
/// simultaneous scans of the same code.
pub async fn redeem_by_qr(
    pool: &SqlitePool,
    qr_code: &str,
    scanned_by: &str,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE tickets SET status = 'used', scanned_at = ?1, scanned_by = ?2, updated_at = ?1 WHERE qr_code = ?3 AND status = 'approved'",
    )
    .bind(now)
    .bind(scanned_by.to_string())
    .bind(qr_code.to_string())
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Reassign one ticket to another table
pub async fn set_table(
    pool: &SqlitePool,
    id: i64,
    table_id: &str,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE tickets SET table_id = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(table_id.to_string())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

/// Table ids of every ticket counting toward occupancy (`approved`/`used`)
pub async fn active_table_ids(pool: &SqlitePool) -> RepoResult<Vec<Option<String>>> {
    let rows = sqlx::query_scalar::<_, Option<String>>(
        "SELECT table_id FROM tickets WHERE status IN ('approved', 'used')",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
