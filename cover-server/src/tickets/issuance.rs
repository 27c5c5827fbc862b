//! Ticket Issuance Engine
//!
//! Converts an approved purchase request into one redeemable ticket per
//! attendee name. Runs on the approval transaction: a failed insert aborts
//! the whole batch together with the request's status flip, so issuance is
//! all-or-nothing from the caller's perspective. The engine never retries.

use crate::db::repository::{RepoError, RepoResult, ticket};
use crate::tickets::qr;
use shared::models::TicketCreate;
use sqlx::SqliteConnection;

/// Create one `approved` ticket per name, linked to the purchase request.
///
/// Names must be non-empty; each is trimmed before storage. Returns the
/// number of tickets created.
pub async fn issue(
    conn: &mut SqliteConnection,
    purchase_request_id: i64,
    user_id: &str,
    table_id: Option<&str>,
    names: &[String],
) -> RepoResult<usize> {
    if names.is_empty() {
        return Err(RepoError::Validation(
            "No attendee names to create tickets for".into(),
        ));
    }

    let now = shared::util::now_millis();
    let mut created = 0usize;
    for name in names {
        let cover_name = name.trim();
        if cover_name.is_empty() {
            return Err(RepoError::Validation(format!(
                "Name {} is empty",
                created + 1
            )));
        }
        let data = TicketCreate {
            purchase_request_id: Some(purchase_request_id),
            user_id: user_id.to_string(),
            qr_code: qr::generate_qr_code(),
            cover_name: cover_name.to_string(),
            table_id: table_id.map(|t| t.to_string()),
        };
        ticket::insert_approved(conn, &data, now).await?;
        created += 1;
    }

    tracing::info!(
        purchase_request_id,
        count = created,
        "Tickets issued for purchase request"
    );
    Ok(created)
}
