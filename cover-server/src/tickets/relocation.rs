//! Table Relocation
//!
//! Administrative reassignment of tickets to another table. Each ticket is
//! updated independently: the operation reports moved / skipped / failed
//! counts instead of an all-or-nothing outcome, and the caller decides
//! whether to retry the failed subset. No destination capacity check is
//! enforced: an admin may deliberately overbook a table.

use crate::db::repository::ticket;
use serde::Serialize;
use sqlx::SqlitePool;

/// Per-batch relocation outcome
#[derive(Debug, Clone, Serialize)]
pub struct RelocationReport {
    /// Normalized destination (`mesa-` prefixed)
    pub destination: String,
    pub moved: usize,
    /// Tickets already at the destination (no-op success, no write issued)
    pub skipped: usize,
    pub failed: usize,
}

impl RelocationReport {
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Move the given tickets to `destination`.
///
/// The destination accepts either the bare map key (`"32"`) or the storage
/// form (`"mesa-32"`); tickets always store the prefixed form.
pub async fn relocate(
    pool: &SqlitePool,
    ticket_ids: &[i64],
    destination: &str,
) -> RelocationReport {
    let destination = shared::util::table_storage_id(destination);
    let now = shared::util::now_millis();

    let mut report = RelocationReport {
        destination: destination.clone(),
        moved: 0,
        skipped: 0,
        failed: 0,
    };

    for &id in ticket_ids {
        match ticket::find_by_id(pool, id).await {
            Ok(Some(t)) if t.table_id.as_deref() == Some(destination.as_str()) => {
                // Already there: skip the write and the misleading "moved"
                report.skipped += 1;
            }
            Ok(Some(_)) => match ticket::set_table(pool, id, &destination, now).await {
                Ok(rows) if rows > 0 => report.moved += 1,
                Ok(_) => {
                    tracing::warn!(ticket_id = id, "Relocation matched no row");
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::warn!(ticket_id = id, error = %e, "Relocation update failed");
                    report.failed += 1;
                }
            },
            Ok(None) => {
                tracing::warn!(ticket_id = id, "Relocation target not found");
                report.failed += 1;
            }
            Err(e) => {
                tracing::warn!(ticket_id = id, error = %e, "Relocation lookup failed");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        destination = %report.destination,
        moved = report.moved,
        skipped = report.skipped,
        failed = report.failed,
        "Relocation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ticket::{find_by_id, insert_approved};
    use crate::db::test_support::test_pool;
    use shared::models::TicketCreate;

    async fn seed_ticket(pool: &SqlitePool, qr: &str, table: &str) -> i64 {
        let mut conn = pool.acquire().await.unwrap();
        let data = TicketCreate {
            purchase_request_id: None,
            user_id: "user-1".to_string(),
            qr_code: qr.to_string(),
            cover_name: "Ana".to_string(),
            table_id: Some(table.to_string()),
        };
        insert_approved(&mut conn, &data, 1000).await.unwrap()
    }

    #[tokio::test]
    async fn test_relocate_moves_ticket() {
        let pool = test_pool().await;
        let id = seed_ticket(&pool, "AFTR-1-aa", "mesa-10").await;

        let report = relocate(&pool, &[id], "mesa-32").await;
        assert_eq!(report.moved, 1);
        assert_eq!(report.failed, 0);
        assert!(report.all_ok());

        let t = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(t.table_id.as_deref(), Some("mesa-32"));
    }

    #[tokio::test]
    async fn test_bare_destination_is_normalized() {
        let pool = test_pool().await;
        let id = seed_ticket(&pool, "AFTR-1-aa", "mesa-10").await;

        let report = relocate(&pool, &[id], "32").await;
        assert_eq!(report.destination, "mesa-32");
        let t = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(t.table_id.as_deref(), Some("mesa-32"));
    }

    #[tokio::test]
    async fn test_already_at_destination_is_noop() {
        let pool = test_pool().await;
        let id = seed_ticket(&pool, "AFTR-1-aa", "mesa-32").await;
        let before = find_by_id(&pool, id).await.unwrap().unwrap();

        let report = relocate(&pool, &[id], "mesa-32").await;
        assert_eq!(report.moved, 0);
        assert_eq!(report.skipped, 1);
        assert!(report.all_ok());

        // No write happened
        let after = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported() {
        let pool = test_pool().await;
        let id = seed_ticket(&pool, "AFTR-1-aa", "mesa-10").await;

        let report = relocate(&pool, &[id, 9999], "mesa-32").await;
        assert_eq!(report.moved, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.all_ok());
    }
}
