//! Provider gateway: HTTP backends for the two provider classes and the
//! dispatcher that applies the bounded image fallback.

pub mod dispatcher;
mod failure;
mod fallback;
mod image;
mod text;

pub use dispatcher::{DispatchResult, ModelDispatcher};
pub use failure::{BODY_PREVIEW_CHARS, ProviderFailure};
pub use fallback::KeylessImageClient;
pub use image::ImageClient;
pub use text::TextClient;

use async_trait::async_trait;

/// One generative backend: a model identity plus a prompt-to-content call.
///
/// Implementations perform blocking I/O with an enforced per-call timeout;
/// a timeout is reported as an ordinary [`ProviderFailure`]. The returned
/// string is either generated text or a reference/URI for generated images.
#[async_trait]
pub trait GenerateBackend: Send + Sync {
    /// Identity recorded as `model_used` when this backend answers.
    fn model_id(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, ProviderFailure>;
}
