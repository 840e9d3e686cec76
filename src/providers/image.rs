use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

use super::{GenerateBackend, ProviderFailure};
use crate::config::ImageProviderConfig;

/// Primary image provider over a `models/{model}:predict` endpoint.
///
/// The generated image comes back base64-encoded and is surfaced as a
/// `data:image/png;base64,...` URI, which is what gets persisted as the
/// exchange response.
pub struct ImageClient {
    client: reqwest::Client,
    predict_url: Url,
    model: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: String,
}

impl ImageClient {
    pub fn new(cfg: &ImageProviderConfig, client: reqwest::Client) -> Self {
        let base = cfg.endpoint.as_str().trim_end_matches('/');
        let predict_url = Url::parse(&format!("{base}/models/{}:predict", cfg.model))
            .expect("image provider endpoint and model must form a valid predict URL");
        Self {
            client,
            predict_url,
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout(),
        }
    }
}

#[async_trait]
impl GenerateBackend for ImageClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": { "sampleCount": 1, "aspectRatio": "1:1" },
        });

        let resp = self
            .client
            .post(self.predict_url.clone())
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderFailure::from_reqwest(e, self.timeout))?;

        if !resp.status().is_success() {
            return Err(ProviderFailure::from_status(resp).await);
        }

        let payload: PredictResponse = resp
            .json()
            .await
            .map_err(|e| ProviderFailure::Payload(e.to_string()))?;

        payload
            .predictions
            .into_iter()
            .next()
            .map(|p| format!("data:image/png;base64,{}", p.bytes_base64_encoded))
            .ok_or_else(|| ProviderFailure::Payload("predict response carried no predictions".to_string()))
    }
}
