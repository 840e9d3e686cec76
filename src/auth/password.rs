use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{Error as PasswordHashError, PasswordHash, SaltString, rand_core::OsRng},
};

use crate::error::PrismError;

/// Hashes a password with a fresh random salt.
///
/// The output is a self-describing PHC string (algorithm, parameters, salt,
/// digest), so verification needs no extra stored state.
pub fn hash_password(password: &str) -> Result<String, PrismError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PrismError::PasswordHash(e.to_string()))
}

/// Verifies a candidate password against a stored digest.
///
/// A mismatch is `InvalidCredentials`; anything else (malformed stored hash,
/// unsupported parameters) is an internal error, not a caller mistake.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), PrismError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| PrismError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => PrismError::InvalidCredentials,
            other => PrismError::PasswordHash(other.to_string()),
        })
}
