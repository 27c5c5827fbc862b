//! Redemption Validator
//!
//! Validates a presented QR code at the door and consumes the ticket.
//! Single-use is enforced by the conditional UPDATE in the repository
//! (`WHERE status = 'approved'`): two simultaneous scans of the same code
//! produce exactly one success and one `AlreadyRedeemed`.

use crate::db::repository::{RepoError, ticket};
use crate::utils::AppError;
use shared::models::{Ticket, TicketStatus};
use sqlx::SqlitePool;
use thiserror::Error;

/// Outcome of a failed scan
///
/// `AlreadyRedeemed` and `NotApproved` are distinct so door staff can tell
/// "already scanned" from "invalid ticket".
#[derive(Debug, Error)]
pub enum RedeemError {
    #[error("Ticket not found")]
    NotFound,

    #[error("Ticket was already used")]
    AlreadyRedeemed,

    #[error("Ticket is not approved")]
    NotApproved,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<RedeemError> for AppError {
    fn from(e: RedeemError) -> Self {
        match e {
            RedeemError::NotFound => AppError::NotFound("Ticket not found".into()),
            RedeemError::AlreadyRedeemed => {
                AppError::AlreadyRedeemed("This ticket was already used".into())
            }
            RedeemError::NotApproved => {
                AppError::NotApproved("This ticket is not approved".into())
            }
            RedeemError::Repo(e) => e.into(),
        }
    }
}

/// Consume a ticket by QR code, recording when and by whom.
///
/// On success returns the ticket's display data (name, table) for the door
/// staff UI.
pub async fn redeem(
    pool: &SqlitePool,
    qr_code: &str,
    scanned_by: &str,
) -> Result<Ticket, RedeemError> {
    let now = shared::util::now_millis();
    let rows = ticket::redeem_by_qr(pool, qr_code, scanned_by, now).await?;

    if rows > 0 {
        let redeemed = ticket::find_by_qr(pool, qr_code)
            .await?
            .ok_or(RedeemError::NotFound)?;
        tracing::info!(
            ticket_id = redeemed.id,
            cover_name = %redeemed.cover_name,
            scanned_by,
            "Ticket redeemed"
        );
        return Ok(redeemed);
    }

    // The guard matched nothing: either the code is unknown or the ticket
    // is not in `approved`. Re-read to report which.
    match ticket::find_by_qr(pool, qr_code).await? {
        None => Err(RedeemError::NotFound),
        Some(t) if t.status == TicketStatus::Used => Err(RedeemError::AlreadyRedeemed),
        Some(_) => Err(RedeemError::NotApproved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ticket::{find_by_qr, insert_approved};
    use crate::db::test_support::test_pool;
    use shared::models::TicketCreate;

    async fn seed_ticket(pool: &SqlitePool, qr: &str) {
        let mut conn = pool.acquire().await.unwrap();
        let data = TicketCreate {
            purchase_request_id: None,
            user_id: "user-1".to_string(),
            qr_code: qr.to_string(),
            cover_name: "Ana".to_string(),
            table_id: Some("mesa-32".to_string()),
        };
        insert_approved(&mut conn, &data, 1000).await.unwrap();
    }

    async fn seed_pending_ticket(pool: &SqlitePool, qr: &str) {
        seed_ticket(pool, qr).await;
        sqlx::query("UPDATE tickets SET status = 'pending' WHERE qr_code = ?")
            .bind(qr.to_string())
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_redeem_success_sets_scan_fields() {
        let pool = test_pool().await;
        seed_ticket(&pool, "AFTR-1-aa").await;

        let t = redeem(&pool, "AFTR-1-aa", "admin-1").await.unwrap();
        assert_eq!(t.status, TicketStatus::Used);
        assert_eq!(t.scanned_by.as_deref(), Some("admin-1"));
        assert!(t.scanned_at.is_some());
        assert_eq!(t.cover_name, "Ana");
    }

    #[tokio::test]
    async fn test_second_scan_reports_already_redeemed() {
        let pool = test_pool().await;
        seed_ticket(&pool, "AFTR-1-aa").await;

        redeem(&pool, "AFTR-1-aa", "admin-1").await.unwrap();
        let err = redeem(&pool, "AFTR-1-aa", "admin-2").await.unwrap_err();
        assert!(matches!(err, RedeemError::AlreadyRedeemed));

        // scanned_at/scanned_by still belong to the first scan
        let t = find_by_qr(&pool, "AFTR-1-aa").await.unwrap().unwrap();
        assert_eq!(t.scanned_by.as_deref(), Some("admin-1"));
    }

    #[tokio::test]
    async fn test_concurrent_scans_one_winner() {
        let pool = test_pool().await;
        seed_ticket(&pool, "AFTR-1-aa").await;

        let (a, b) = tokio::join!(
            redeem(&pool, "AFTR-1-aa", "door-a"),
            redeem(&pool, "AFTR-1-aa", "door-b"),
        );
        let successes = [a.is_ok(), b.is_ok()].iter().filter(|s| **s).count();
        assert_eq!(successes, 1);
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser.unwrap_err(), RedeemError::AlreadyRedeemed));
    }

    #[tokio::test]
    async fn test_pending_ticket_not_redeemable() {
        let pool = test_pool().await;
        seed_pending_ticket(&pool, "AFTR-2-bb").await;

        let err = redeem(&pool, "AFTR-2-bb", "admin-1").await.unwrap_err();
        assert!(matches!(err, RedeemError::NotApproved));

        // Status must be untouched
        let t = find_by_qr(&pool, "AFTR-2-bb").await.unwrap().unwrap();
        assert_eq!(t.status, TicketStatus::Pending);
        assert!(t.scanned_at.is_none());
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let pool = test_pool().await;
        let err = redeem(&pool, "AFTR-0-nope", "admin-1").await.unwrap_err();
        assert!(matches!(err, RedeemError::NotFound));
    }
}
