use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

use super::{GenerateBackend, ProviderFailure};
use crate::config::TextProviderConfig;

const SYSTEM_PREAMBLE: &str = "You are a helpful AI assistant.";

/// Text provider over an OpenAI-style chat-completions endpoint.
pub struct TextClient {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl TextClient {
    pub fn new(cfg: &TextProviderConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout(),
        }
    }
}

#[async_trait]
impl GenerateBackend for TextClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PREAMBLE },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.7,
            "max_tokens": 1024,
        });

        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderFailure::from_reqwest(e, self.timeout))?;

        if !resp.status().is_success() {
            return Err(ProviderFailure::from_status(resp).await);
        }

        let completion: ChatCompletion = resp
            .json()
            .await
            .map_err(|e| ProviderFailure::Payload(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderFailure::Payload("completion carried no choices".to_string()))
    }
}
