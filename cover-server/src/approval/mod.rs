//! Approval State Machine
//!
//! Admin workflow transitioning a purchase request `pending → approved`
//! (with ticket issuance) or `pending → rejected`. The status guard in the
//! conditional UPDATE is the sole concurrency-safety mechanism: a
//! double-click or two admins racing on the same request produce exactly
//! one success and one `AlreadyProcessed`, never duplicate tickets.
//!
//! Approve and issue run in one SQLite transaction, so an issuance failure
//! aborts the status flip together with the partially inserted batch;
//! afterwards the request is still `pending`, zero tickets exist, and a
//! retry is possible.

use crate::db::repository::{RepoError, purchase_request};
use crate::tickets::issuance;
use crate::utils::AppError;
use shared::models::PurchaseRequest;
use sqlx::SqlitePool;
use thiserror::Error;

/// Outcome of a failed approve/reject
#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("Purchase request not found")]
    NotFound,

    /// The request had already left `pending` when the guard ran, the
    /// expected outcome for the loser of a race, not a bug.
    #[error("Purchase request already processed")]
    AlreadyProcessed,

    /// Ticket creation failed after the status flip; the transaction was
    /// aborted and the request is back in `pending`.
    #[error("Ticket issuance failed: {0}")]
    Issuance(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<ApprovalError> for AppError {
    fn from(e: ApprovalError) -> Self {
        match e {
            ApprovalError::NotFound => AppError::NotFound("Purchase request not found".into()),
            ApprovalError::AlreadyProcessed => {
                AppError::AlreadyProcessed("Purchase request was already processed".into())
            }
            ApprovalError::Issuance(msg) => {
                AppError::Internal(format!("Ticket issuance failed: {msg}"))
            }
            ApprovalError::Repo(e) => e.into(),
        }
    }
}

/// Successful approval: the updated request plus the tickets created for it
#[derive(Debug)]
pub struct ApprovedRequest {
    pub request: PurchaseRequest,
    pub tickets_created: usize,
}

/// Distinguish "no such id" from "already processed" after a guard miss
async fn classify_guard_miss(pool: &SqlitePool, request_id: i64) -> ApprovalError {
    match purchase_request::status_of(pool, request_id).await {
        Ok(None) => ApprovalError::NotFound,
        Ok(Some(_)) => ApprovalError::AlreadyProcessed,
        Err(e) => ApprovalError::Repo(e),
    }
}

/// Approve a pending request and issue its tickets.
///
/// The admin precondition is enforced at the API layer (`require_admin`);
/// this function assumes an authorized caller.
pub async fn approve(pool: &SqlitePool, request_id: i64) -> Result<ApprovedRequest, ApprovalError> {
    let now = shared::util::now_millis();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApprovalError::Repo(RepoError::Database(e.to_string())))?;

    let Some(request) = purchase_request::mark_approved(&mut tx, request_id, now).await? else {
        // Guard matched nothing; release the transaction before reading
        // the status on the pool
        tx.rollback().await.ok();
        return Err(classify_guard_miss(pool, request_id).await);
    };

    let tickets_created = issuance::issue(
        &mut tx,
        request.id,
        &request.user_id,
        request.table_id.as_deref(),
        &request.names,
    )
    .await
    .map_err(|e| ApprovalError::Issuance(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| ApprovalError::Repo(RepoError::Database(e.to_string())))?;

    tracing::info!(
        request_id,
        user_id = %request.user_id,
        tickets_created,
        "Purchase request approved"
    );
    Ok(ApprovedRequest {
        request,
        tickets_created,
    })
}

/// Reject a pending request. No side effects on tickets.
///
/// Retrying against an already-rejected (or approved) request reports
/// `AlreadyProcessed` rather than a hard failure.
pub async fn reject(pool: &SqlitePool, request_id: i64) -> Result<(), ApprovalError> {
    let now = shared::util::now_millis();
    let rows = purchase_request::mark_rejected(pool, request_id, now).await?;
    if rows == 0 {
        return Err(classify_guard_miss(pool, request_id).await);
    }
    tracing::info!(request_id, "Purchase request rejected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::purchase_request::{create, find_by_id, status_of};
    use crate::db::repository::ticket;
    use crate::db::test_support::{request_create, test_pool};
    use shared::models::{PurchaseStatus, TicketStatus};
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_approve_issues_one_ticket_per_name() {
        let pool = test_pool().await;
        let req = create(&pool, request_create("user-1", &["Ana", "Beto", "Caro"]))
            .await
            .unwrap();
        assert_eq!(req.total_price, 1500.0);

        let approved = approve(&pool, req.id).await.unwrap();
        assert_eq!(approved.tickets_created, 3);
        assert_eq!(approved.request.status, PurchaseStatus::Approved);

        let tickets = ticket::find_by_purchase_request(&pool, req.id).await.unwrap();
        assert_eq!(tickets.len(), 3);
        let qr_codes: HashSet<&str> = tickets.iter().map(|t| t.qr_code.as_str()).collect();
        assert_eq!(qr_codes.len(), 3);
        for t in &tickets {
            assert_eq!(t.status, TicketStatus::Approved);
            assert_eq!(t.purchase_request_id, Some(req.id));
            assert_eq!(t.table_id.as_deref(), Some("mesa-32"));
        }
    }

    #[tokio::test]
    async fn test_approve_missing_request() {
        let pool = test_pool().await;
        let err = approve(&pool, 999).await.unwrap_err();
        assert!(matches!(err, ApprovalError::NotFound));
    }

    #[tokio::test]
    async fn test_double_approve_single_winner() {
        let pool = test_pool().await;
        let req = create(&pool, request_create("user-1", &["Ana", "Beto", "Caro"]))
            .await
            .unwrap();

        // Two admins click "approve" at the same time
        let (a, b) = tokio::join!(approve(&pool, req.id), approve(&pool, req.id));
        let successes = [a.is_ok(), b.is_ok()].iter().filter(|s| **s).count();
        assert_eq!(successes, 1);
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser.unwrap_err(), ApprovalError::AlreadyProcessed));

        // Exactly quantity tickets, never 2x
        let tickets = ticket::find_by_purchase_request(&pool, req.id).await.unwrap();
        assert_eq!(tickets.len(), 3);
    }

    #[tokio::test]
    async fn test_reject_then_approve_reports_already_processed() {
        let pool = test_pool().await;
        let req = create(&pool, request_create("user-1", &["Ana"])).await.unwrap();

        reject(&pool, req.id).await.unwrap();
        let err = approve(&pool, req.id).await.unwrap_err();
        assert!(matches!(err, ApprovalError::AlreadyProcessed));
        assert_eq!(
            status_of(&pool, req.id).await.unwrap(),
            Some(PurchaseStatus::Rejected)
        );
    }

    #[tokio::test]
    async fn test_reject_approved_request_leaves_tickets_alone() {
        let pool = test_pool().await;
        let req = create(&pool, request_create("user-1", &["Ana", "Beto"]))
            .await
            .unwrap();
        approve(&pool, req.id).await.unwrap();

        let err = reject(&pool, req.id).await.unwrap_err();
        assert!(matches!(err, ApprovalError::AlreadyProcessed));

        let tickets = ticket::find_by_purchase_request(&pool, req.id).await.unwrap();
        assert_eq!(tickets.len(), 2);
        for t in &tickets {
            assert_eq!(t.status, TicketStatus::Approved);
        }
    }

    #[tokio::test]
    async fn test_reject_missing_request() {
        let pool = test_pool().await;
        let err = reject(&pool, 999).await.unwrap_err();
        assert!(matches!(err, ApprovalError::NotFound));
    }

    #[tokio::test]
    async fn test_issuance_failure_leaves_request_pending() {
        let pool = test_pool().await;
        let req = create(&pool, request_create("user-1", &["Ana", "Beto"]))
            .await
            .unwrap();

        // Simulate a storage failure mid-issuance
        sqlx::query("DROP TABLE tickets").execute(&pool).await.unwrap();

        let err = approve(&pool, req.id).await.unwrap_err();
        assert!(matches!(err, ApprovalError::Issuance(_)));

        // Status flip aborted with the batch: still pending, retry possible
        let after = find_by_id(&pool, req.id).await.unwrap().unwrap();
        assert_eq!(after.status, PurchaseStatus::Pending);
    }

    #[tokio::test]
    async fn test_retry_after_issuance_failure() {
        let pool = test_pool().await;
        let req = create(&pool, request_create("user-1", &["Ana"])).await.unwrap();

        // First attempt fails against a broken tickets table
        sqlx::query("ALTER TABLE tickets RENAME TO tickets_gone")
            .execute(&pool)
            .await
            .unwrap();
        assert!(approve(&pool, req.id).await.is_err());

        // Storage recovers; the retry must succeed from pending
        sqlx::query("ALTER TABLE tickets_gone RENAME TO tickets")
            .execute(&pool)
            .await
            .unwrap();
        let approved = approve(&pool, req.id).await.unwrap();
        assert_eq!(approved.tickets_created, 1);
    }
}
