//! Checkout API Handlers (card flow)
//!
//! The purchase data rides in the checkout session's metadata: the
//! verification endpoint re-fetches the session server-side and trusts
//! only what the provider returns, never the client.

use axum::{
    Json,
    extract::{Extension, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, purchase_request};
use crate::services::CheckoutParams;
use crate::utils::validation::validate_cover_names;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{PaymentMethod, PurchaseRequestCreate};

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub table_id: Option<String>,
    pub quantity: i64,
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    /// Hosted checkout URL to redirect the customer to
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub session_id: String,
}

/// POST /api/checkout/session - start a card checkout
pub async fn create_session(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateSessionRequest>,
) -> AppResult<Json<AppResponse<CreateSessionResponse>>> {
    if !state.payments.is_configured() {
        return Err(AppError::upstream("Card payments are not configured"));
    }
    validate_cover_names(&payload.names, payload.quantity)?;

    let table_id = match payload.table_id.as_deref() {
        None | Some("sin-mesa") | Some("") => None,
        Some(raw) if state.event.is_valid_table_id(raw) => {
            Some(shared::util::table_storage_id(raw))
        }
        Some(raw) => return Err(AppError::validation(format!("Unknown table: {raw}"))),
    };

    let params = CheckoutParams {
        user_id: user.id.clone(),
        table_id,
        quantity: payload.quantity,
        names: payload.names,
        // Totals are computed here, never taken from the client
        total_price: state.event.total_price(payload.quantity),
    };
    let base = &state.config.public_base_url;
    let success_url = format!("{base}/compra/success?session_id={{CHECKOUT_SESSION_ID}}");
    let cancel_url = format!("{base}/compra");

    let session = state
        .payments
        .create_checkout_session(&params, &success_url, &cancel_url)
        .await?;
    let url = session
        .url
        .ok_or_else(|| AppError::upstream("Payment provider returned no checkout URL"))?;

    tracing::info!(user_id = %user.id, session_id = %session.id, "Checkout session created");
    Ok(ok(CreateSessionResponse { url }))
}

/// GET /api/checkout/verify?session_id= - confirm payment, record the request
///
/// Idempotent on the session id: re-verifying an already-recorded session
/// returns success without inserting again, including when two verify
/// calls race and one loses the unique-constraint insert.
pub async fn verify_session(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<VerifyQuery>,
) -> AppResult<Json<AppResponse<bool>>> {
    if query.session_id.trim().is_empty() {
        return Err(AppError::validation("session_id is required"));
    }

    let session = state
        .payments
        .fetch_checkout_session(&query.session_id)
        .await?;
    if !session.is_paid() {
        return Err(AppError::Invalid("Payment is not completed".into()));
    }

    let metadata_user = session
        .metadata
        .get("user_id")
        .ok_or_else(|| AppError::Invalid("Invalid session: missing metadata".into()))?;
    if metadata_user != &user.id {
        return Err(AppError::forbidden("Session belongs to another user"));
    }

    let quantity: i64 = session
        .metadata
        .get("quantity")
        .and_then(|q| q.parse().ok())
        .unwrap_or(0);
    let names: Vec<String> = session
        .metadata
        .get("names_json")
        .and_then(|n| serde_json::from_str(n).ok())
        .ok_or_else(|| AppError::Invalid("Invalid session: bad names".into()))?;
    if quantity < 1 || (names.len() as i64) < quantity {
        return Err(AppError::Invalid("Invalid session: bad purchase data".into()));
    }
    let names: Vec<String> = names.into_iter().take(quantity as usize).collect();

    // Idempotency: a session already recorded is a success, not a duplicate
    if purchase_request::find_by_session(&state.pool, &session.id)
        .await?
        .is_some()
    {
        return Ok(ok(true));
    }

    let table_id = session
        .metadata
        .get("table_id")
        .filter(|t| t.as_str() != "sin-mesa" && !t.is_empty())
        .cloned();

    let data = PurchaseRequestCreate {
        user_id: user.id.clone(),
        table_id,
        quantity,
        names,
        total_price: session.amount_total.unwrap_or(0) as f64 / 100.0,
        proof_of_payment_url: None,
        reference: session.derived_reference(),
        payment_method: PaymentMethod::Card,
        checkout_session_id: Some(session.id.clone()),
    };

    match purchase_request::create_with_reference_retry(&state.pool, data).await {
        Ok(request) => {
            tracing::info!(
                request_id = request.id,
                session_id = %session.id,
                "Card purchase recorded"
            );
            Ok(ok(true))
        }
        // Lost a race against a concurrent verify of the same session
        Err(RepoError::Duplicate(msg)) if msg.contains("checkout_session_id") => Ok(ok(true)),
        Err(e) => Err(e.into()),
    }
}
