//! Admin API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::{Deserialize, Serialize};

use crate::approval;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{purchase_request, ticket};
use crate::tickets::{RelocationReport, relocate};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{PurchaseRequest, Ticket};

/// GET /api/admin/purchase-requests/pending - review queue, newest first
pub async fn pending_requests(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<PurchaseRequest>>> {
    let requests = purchase_request::find_pending(&state.pool).await?;
    Ok(Json(requests))
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub tickets_created: usize,
}

/// POST /api/admin/purchase-requests/:id/approve
///
/// Flips the request to `approved` and issues its tickets. The
/// notification email is fire-and-forget: a delivery failure is logged
/// and never turns a completed approval into an error.
pub async fn approve(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<ApproveResponse>>> {
    let approved = approval::approve(&state.pool, id).await?;
    tracing::info!(
        request_id = id,
        admin_id = %admin.id,
        tickets_created = approved.tickets_created,
        "Approved by admin"
    );

    let notify_state = state.clone();
    let purchaser = approved.request.user_id.clone();
    tokio::spawn(async move {
        notify_purchaser(&notify_state, &purchaser).await;
    });

    Ok(ok(ApproveResponse {
        tickets_created: approved.tickets_created,
    }))
}

async fn notify_purchaser(state: &ServerState, user_id: &str) {
    let email = match state.roles.email_for_user(user_id).await {
        Ok(Some(email)) => email,
        Ok(None) => {
            tracing::debug!(user_id, "No notification email on file");
            return;
        }
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Failed to resolve notification email");
            return;
        }
    };
    if let Err(e) = state
        .email
        .send_ticket_approved(&email, state.event.brand, state.event.event_name)
        .await
    {
        tracing::warn!(user_id, error = %e, "Approval notification failed");
    }
}

/// POST /api/admin/purchase-requests/:id/reject
pub async fn reject(
    State(state): State<ServerState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    approval::reject(&state.pool, id).await?;
    tracing::info!(request_id = id, admin_id = %admin.id, "Rejected by admin");
    Ok(ok(true))
}

/// GET /api/admin/tickets - full ticket list for the table dashboard
pub async fn all_tickets(State(state): State<ServerState>) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = ticket::find_all(&state.pool).await?;
    Ok(Json(tickets))
}

#[derive(Debug, Deserialize)]
pub struct RelocateTicketsRequest {
    pub ticket_ids: Vec<i64>,
    /// `"32"` or `"mesa-32"`
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct RelocateOrderRequest {
    pub destination: String,
}

fn validate_destination(destination: &str) -> AppResult<()> {
    if destination.trim().is_empty() {
        return Err(AppError::validation("Destination table is required"));
    }
    Ok(())
}

/// POST /api/admin/tickets/relocate - move individual covers
///
/// Partial failures are reported, not rolled back; the response carries
/// moved / skipped / failed counts for the admin to act on.
pub async fn relocate_tickets(
    State(state): State<ServerState>,
    Json(payload): Json<RelocateTicketsRequest>,
) -> AppResult<Json<AppResponse<RelocationReport>>> {
    validate_destination(&payload.destination)?;
    if payload.ticket_ids.is_empty() {
        return Err(AppError::validation("No tickets to relocate"));
    }

    let report = relocate(&state.pool, &payload.ticket_ids, &payload.destination).await;
    Ok(ok(report))
}

/// POST /api/admin/purchase-requests/:id/relocate - move a whole order
pub async fn relocate_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RelocateOrderRequest>,
) -> AppResult<Json<AppResponse<RelocationReport>>> {
    validate_destination(&payload.destination)?;

    let tickets = ticket::find_by_purchase_request(&state.pool, id).await?;
    if tickets.is_empty() {
        return Err(AppError::not_found(format!(
            "No tickets for purchase request {id}"
        )));
    }

    let ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();
    let report = relocate(&state.pool, &ids, &payload.destination).await;
    Ok(ok(report))
}
