use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::PrismError;

/// Issues and verifies stateless signed bearer tokens.
///
/// The token itself carries the identity and an absolute expiry, signed with
/// a process-wide secret, so verification is pure computation with no store
/// lookup and any number of server instances can validate independently.
/// The trade-off is that there is no server-initiated revocation before
/// expiry; the configured lifetime bounds the exposure of a leaked token.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

/// Claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    /// User id the token was issued for.
    pub sub: i64,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Absolute expiry, seconds since the epoch.
    pub exp: i64,
}

/// A freshly signed token plus its expiry instant for the response body.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenAuthority {
    pub fn new(cfg: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No leeway: the expiry boundary is exact.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(cfg.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(cfg.token_secret.as_bytes()),
            validation,
            ttl: Duration::seconds(i64::try_from(cfg.token_ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    /// Signs a token for `user_id` expiring `token_ttl_secs` from now.
    pub fn issue(&self, user_id: i64) -> Result<IssuedToken, PrismError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| PrismError::InvalidToken)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Validates signature and expiry, returning the encoded identity.
    ///
    /// A well-signed token past its expiry is `ExpiredToken`; every other
    /// failure (bad signature, malformed shape, missing claims) collapses to
    /// `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<i64, PrismError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => PrismError::ExpiredToken,
                _ => PrismError::InvalidToken,
            })
    }
}
