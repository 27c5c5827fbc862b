//! Purchases API Handlers
//!
//! Transfer-flow checkout: the customer uploads a proof of payment and the
//! request waits in `pending` until an admin verifies the transfer.

use axum::{
    Json,
    extract::{Extension, Multipart, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::purchase_request;
use crate::utils::validation::validate_cover_names;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{PaymentMethod, PurchaseRequest, PurchaseRequestCreate};

/// Resolve and validate the submitted table choice.
///
/// Accepts `"mesa-32"` or bare `"32"`; `"sin-mesa"` (or nothing) means a
/// cover without a table and is stored as NULL.
fn resolve_table_id(state: &ServerState, raw: Option<String>) -> AppResult<Option<String>> {
    let Some(raw) = raw.filter(|t| !t.trim().is_empty()) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw == "sin-mesa" {
        return Ok(None);
    }
    if !state.event.is_valid_table_id(raw) {
        return Err(AppError::validation(format!("Unknown table: {raw}")));
    }
    Ok(Some(shared::util::table_storage_id(raw)))
}

/// POST /api/purchases - submit a transfer-flow purchase request
///
/// Multipart fields: `table_id` (optional), `quantity`, `names` (one field
/// per attendee), `proof` (receipt image or PDF, required).
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<PurchaseRequest>>> {
    let mut table_id: Option<String> = None;
    let mut quantity: Option<i64> = None;
    let mut names: Vec<String> = Vec::new();
    let mut proof: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "table_id" => table_id = Some(field.text().await?),
            "quantity" => {
                let raw = field.text().await?;
                quantity = Some(raw.trim().parse().map_err(|_| {
                    AppError::validation(format!("Invalid quantity: {raw}"))
                })?);
            }
            "names" => names.push(field.text().await?),
            "proof" => {
                let file_name = field.file_name().unwrap_or("proof.bin").to_string();
                let bytes = field.bytes().await?;
                proof = Some((file_name, bytes.to_vec()));
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let quantity = quantity.ok_or_else(|| AppError::validation("Quantity is required"))?;
    validate_cover_names(&names, quantity)?;
    let table_id = resolve_table_id(&state, table_id)?;

    let (file_name, bytes) =
        proof.ok_or_else(|| AppError::validation("Proof of payment is required"))?;

    // Upload first: if storage fails nothing was written to the database
    let proof_url = state.storage.store_payment_proof(&file_name, &bytes).await?;

    let data = PurchaseRequestCreate {
        user_id: user.id.clone(),
        table_id,
        quantity,
        names,
        total_price: state.event.total_price(quantity),
        proof_of_payment_url: Some(proof_url),
        reference: purchase_request::generate_reference(),
        payment_method: PaymentMethod::Transfer,
        checkout_session_id: None,
    };

    let request = purchase_request::create_with_reference_retry(&state.pool, data).await?;
    tracing::info!(
        request_id = request.id,
        user_id = %user.id,
        quantity,
        "Purchase request submitted"
    );
    Ok(ok(request))
}

/// GET /api/purchases/mine - the caller's own requests
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<PurchaseRequest>>> {
    let requests = purchase_request::find_by_user(&state.pool, &user.id).await?;
    Ok(Json(requests))
}
