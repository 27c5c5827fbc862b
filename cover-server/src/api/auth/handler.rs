//! Auth API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::{ROLE_USER, password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, account, user_role};
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user_id: String,
    pub email: String,
}

const MIN_PASSWORD_LEN: usize = 8;

fn validate_credentials(email: &str, pwd: &str) -> AppResult<()> {
    validate_required_text(email, "Email", MAX_EMAIL_LEN)?;
    if !email.contains('@') {
        return Err(AppError::validation("Email is not valid"));
    }
    if pwd.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if pwd.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// POST /api/auth/register - create an account and sign in
///
/// The email is copied into the role row so approval notifications can
/// reach the purchaser later.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AppResponse<SessionResponse>>> {
    let email = payload.email.trim().to_ascii_lowercase();
    validate_credentials(&email, &payload.password)?;

    let password_hash = password::hash_password(&payload.password)?;
    let user_id = uuid::Uuid::new_v4().to_string();

    let user = match account::create(&state.pool, &user_id, &email, &password_hash).await {
        Ok(user) => user,
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::Conflict("Email is already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };
    user_role::upsert(&state.pool, &user.id, ROLE_USER, Some(&user.email)).await?;

    let token = state
        .jwt_service
        .generate_token(&user.id, &user.email)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = %user.id, "Account registered");
    Ok(ok(SessionResponse {
        token,
        user_id: user.id,
        email: user.email,
    }))
}

/// POST /api/auth/login - verify credentials, issue a token
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<SessionResponse>>> {
    let email = payload.email.trim().to_ascii_lowercase();

    let user = account::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !password::verify_password(&payload.password, &user.password_hash) {
        tracing::warn!(target: "security", email = %email, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&user.id, &user.email)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(ok(SessionResponse {
        token,
        user_id: user.id,
        email: user.email,
    }))
}
