//! Tickets API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::ticket;
use crate::utils::{AppError, AppResult};
use shared::models::{Ticket, TicketStatus};

/// GET /api/tickets/mine - the caller's own tickets
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Ticket>>> {
    let tickets = ticket::find_by_user(&state.pool, &user.id).await?;
    Ok(Json(tickets))
}

/// GET /api/tickets/:id/wallet - download the wallet pass
///
/// Preconditions: the caller owns the ticket and it is `approved` or
/// `used`. Pass signing material missing on the server is a 5xx, not the
/// caller's fault.
pub async fn wallet_pass(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let ticket = ticket::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ticket {id} not found")))?;

    if ticket.user_id != user.id {
        return Err(AppError::forbidden("This ticket belongs to another user"));
    }
    if !matches!(ticket.status, TicketStatus::Approved | TicketStatus::Used) {
        return Err(AppError::validation("This ticket is not approved"));
    }

    let pass = state.wallet.build_pass(&ticket, &state.event)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/vnd.apple.pkpass".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"ticket-{}.pkpass\"", ticket.id),
            ),
        ],
        pass,
    )
        .into_response())
}
