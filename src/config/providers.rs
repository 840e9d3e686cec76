use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// All provider configurations.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProvidersConfig {
    /// Text provider (chat-completions style endpoint).
    #[serde(default)]
    pub text: TextProviderConfig,

    /// Primary image provider (`:predict` style endpoint).
    #[serde(default)]
    pub image: ImageProviderConfig,

    /// Keyless fallback image provider, tried once after the primary fails.
    #[serde(default)]
    pub image_fallback: FallbackImageConfig,
}

/// Text provider configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextProviderConfig {
    /// Chat-completions endpoint.
    /// TOML: `providers.text.endpoint`.
    #[serde(default = "default_text_endpoint")]
    pub endpoint: Url,

    /// Model name sent upstream; also recorded as `model_used` in history.
    /// TOML: `providers.text.model`.
    #[serde(default = "default_text_model")]
    pub model: String,

    /// Bearer API key for the text provider.
    /// TOML: `providers.text.api_key`.
    #[serde(default)]
    pub api_key: String,

    /// Per-call timeout in seconds. A timeout is treated like any other
    /// provider failure.
    /// TOML: `providers.text.timeout_secs`. Default: `30`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Primary image provider configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageProviderConfig {
    /// API base; the `models/{model}:predict` path is appended per call.
    /// TOML: `providers.image.endpoint`.
    #[serde(default = "default_image_endpoint")]
    pub endpoint: Url,

    /// Model name used in the predict path and recorded as `model_used`.
    /// TOML: `providers.image.model`.
    #[serde(default = "default_image_model")]
    pub model: String,

    /// API key sent via the `x-goog-api-key` header.
    /// TOML: `providers.image.api_key`.
    #[serde(default)]
    pub api_key: String,

    /// Per-call timeout in seconds.
    /// TOML: `providers.image.timeout_secs`. Default: `30`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Fallback image provider configuration managed by Figment.
///
/// The fallback takes the prompt as a URL path segment and needs no API key,
/// so it keeps working when the primary provider's key is missing or not
/// whitelisted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackImageConfig {
    /// Base URL; the url-encoded prompt is appended as a path segment.
    /// TOML: `providers.image_fallback.endpoint`.
    #[serde(default = "default_fallback_endpoint")]
    pub endpoint: Url,

    /// Identity recorded as `model_used` when the fallback answers.
    /// TOML: `providers.image_fallback.model`.
    #[serde(default = "default_fallback_model")]
    pub model: String,

    /// Per-call timeout in seconds.
    /// TOML: `providers.image_fallback.timeout_secs`. Default: `30`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TextProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ImageProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FallbackImageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TextProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_text_endpoint(),
            model: default_text_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ImageProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_image_endpoint(),
            model: default_image_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FallbackImageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_fallback_endpoint(),
            model: default_fallback_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_text_endpoint() -> Url {
    Url::parse("https://api.groq.com/openai/v1/chat/completions")
        .expect("default text endpoint must parse")
}

fn default_text_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_image_endpoint() -> Url {
    Url::parse("https://generativelanguage.googleapis.com/v1beta")
        .expect("default image endpoint must parse")
}

fn default_image_model() -> String {
    "imagen-3.0-generate-001".to_string()
}

fn default_fallback_endpoint() -> Url {
    Url::parse("https://image.pollinations.ai/prompt").expect("default fallback endpoint must parse")
}

fn default_fallback_model() -> String {
    "pollinations".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
