//! Credential and token handling.
//!
//! Layout:
//! - `password.rs`: one-way salted password digests (argon2)
//! - `tokens.rs`: stateless signed bearer tokens (HS256)

mod password;
mod tokens;

pub use password::{hash_password, verify_password};
pub use tokens::{IssuedToken, TokenAuthority};
