use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::{GenerateBackend, ProviderFailure};
use crate::config::FallbackImageConfig;

/// Keyless fallback image provider.
///
/// The prompt travels url-encoded as a path segment and the image URL itself
/// is the content reference, so this backend keeps working when the primary
/// provider's key is missing, revoked, or over quota. One successful probe
/// confirms the URL resolves before it is handed back.
pub struct KeylessImageClient {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    timeout: Duration,
}

impl KeylessImageClient {
    pub fn new(cfg: &FallbackImageConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            timeout: cfg.timeout(),
        }
    }

    fn image_url(&self, prompt: &str) -> Result<Url, ProviderFailure> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ProviderFailure::Payload("fallback endpoint cannot be a base URL".to_string())
            })?
            .push(prompt);
        Ok(url)
    }
}

#[async_trait]
impl GenerateBackend for KeylessImageClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let url = self.image_url(prompt)?;

        let resp = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderFailure::from_reqwest(e, self.timeout))?;

        if !resp.status().is_success() {
            return Err(ProviderFailure::from_status(resp).await);
        }

        Ok(url.to_string())
    }
}
