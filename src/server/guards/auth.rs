use crate::error::PrismError;
use crate::server::router::PrismState;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

/// Extractor proving the caller holds a valid bearer token.
///
/// Verification is pure computation against the token authority; no store
/// lookup happens here, so the guard adds no I/O to the request path.
/// Handlers taking this extractor receive the verified user id.
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser(pub i64);

impl FromRequestParts<PrismState> for AuthedUser {
    type Rejection = PrismError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PrismState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or(PrismError::InvalidToken)?;

        let user_id = state.authority.verify(bearer.token())?;
        Ok(AuthedUser(user_id))
    }
}
