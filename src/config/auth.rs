use serde::{Deserialize, Serialize};

/// Token authority configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify bearer tokens (required, non-empty).
    /// TOML: `auth.token_secret`. Must be provided.
    ///
    /// Tokens are stateless: leaking this secret allows forging identities,
    /// and there is no revocation before expiry. Keep `token_ttl_secs` short.
    #[serde(default)]
    pub token_secret: String,

    /// Lifetime of issued tokens, in seconds.
    /// TOML: `auth.token_ttl_secs`. Default: `3600` (one hour).
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // No insecure default. `Config::from_toml()` enforces non-empty.
            token_secret: String::new(),
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

fn default_token_ttl_secs() -> u64 {
    3600
}
