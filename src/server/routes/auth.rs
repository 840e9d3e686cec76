use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::db::NewUser;
use crate::error::PrismError;
use crate::server::router::PrismState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// `POST /auth/register`: creates an identity record.
///
/// The password digest is computed here so plaintext never crosses into the
/// store; the unique index on `users.username` is the single source of truth
/// for duplicate detection.
pub async fn register(
    State(state): State<PrismState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), PrismError> {
    let password_hash = hash_password(&req.password)?;
    let user_id = state
        .db
        .create_user(NewUser {
            username: req.username.clone(),
            password_hash,
        })
        .await?;

    info!(user_id, username = %req.username, "registered new user");
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

/// `POST /auth/token`: authenticates and issues a signed bearer token.
///
/// An unknown username and a wrong password are indistinguishable to the
/// caller; both collapse to `INVALID_CREDENTIALS`.
pub async fn issue_token(
    State(state): State<PrismState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, PrismError> {
    let user = state
        .db
        .find_user(&req.username)
        .await?
        .ok_or(PrismError::InvalidCredentials)?;

    verify_password(&req.password, &user.password_hash)?;

    let issued = state.authority.issue(user.id)?;
    Ok(Json(TokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}
