use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::providers::ProviderFailure;

/// Error taxonomy for the request path.
///
/// Every variant maps to a stable machine-readable code in `IntoResponse`;
/// internal causes (SQL errors, hash errors, actor failures) are logged but
/// never serialized across the boundary.
#[derive(Debug, ThisError)]
pub enum PrismError {
    #[error("username '{0}' is already registered")]
    DuplicateUsername(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("provider '{provider}' failed: {cause}")]
    Provider {
        provider: String,
        #[source]
        cause: ProviderFailure,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("actor RPC failed: {0}")]
    Rpc(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl IntoResponse for PrismError {
    fn into_response(self) -> axum::response::Response {
        if matches!(
            self,
            PrismError::Database(_) | PrismError::Rpc(_) | PrismError::PasswordHash(_)
        ) {
            tracing::error!(error = %self, "internal error surfaced to the request boundary");
        }

        let (status, error_body) = match self {
            PrismError::Database(_) | PrismError::Rpc(_) | PrismError::PasswordHash(_) => {
                let body = ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }

            PrismError::DuplicateUsername(username) => {
                let body = ApiErrorObject {
                    code: "DUPLICATE_USERNAME".to_string(),
                    message: format!("Username '{username}' is already registered."),
                    details: None,
                };
                (StatusCode::CONFLICT, body)
            }

            PrismError::InvalidCredentials => {
                let body = ApiErrorObject {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid username or password.".to_string(),
                    details: None,
                };
                (StatusCode::UNAUTHORIZED, body)
            }

            PrismError::InvalidToken => {
                let body = ApiErrorObject {
                    code: "INVALID_TOKEN".to_string(),
                    message: "The bearer token is missing or invalid.".to_string(),
                    details: None,
                };
                (StatusCode::UNAUTHORIZED, body)
            }

            PrismError::ExpiredToken => {
                let body = ApiErrorObject {
                    code: "EXPIRED_TOKEN".to_string(),
                    message: "The bearer token has expired; authenticate again.".to_string(),
                    details: None,
                };
                (StatusCode::UNAUTHORIZED, body)
            }

            PrismError::Provider { provider, cause } => {
                let body = ApiErrorObject {
                    code: "PROVIDER_ERROR".to_string(),
                    message: format!("Provider '{provider}' failed to produce a response."),
                    details: Some(Value::String(cause.to_string())),
                };
                (StatusCode::BAD_GATEWAY, body)
            }
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
