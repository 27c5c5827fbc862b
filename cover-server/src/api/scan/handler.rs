//! Scan API Handlers
//!
//! Door validation. The client may debounce repeated reads of the same
//! code, but single-use is enforced here regardless.

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::tickets::redeem;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::Ticket;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub qr_code: String,
}

/// POST /api/scan - validate and consume a ticket QR code
///
/// Exactly one of two simultaneous scans of the same code succeeds; the
/// other receives `AlreadyRedeemed` (distinct from `NotApproved`).
pub async fn scan(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ScanRequest>,
) -> AppResult<Json<AppResponse<Ticket>>> {
    let qr_code = payload.qr_code.trim();
    if qr_code.is_empty() {
        return Err(AppError::validation("qr_code is required"));
    }

    let ticket = redeem(&state.pool, qr_code, &user.id).await?;
    Ok(ok(ticket))
}
