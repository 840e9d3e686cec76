use std::sync::Arc;
use tracing::warn;

use super::{GenerateBackend, ProviderFailure};
use crate::classify::Route;
use crate::error::PrismError;

/// Successful outcome of one dispatch: the generated content plus the
/// identity of the backend that actually produced it.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub content: String,
    pub model_used: String,
}

/// Routes a classified prompt to the matching backend.
///
/// The fallback policy is bounded: the text route has no fallback at all,
/// and the image route makes at most one extra call. Providers fail fast
/// (network, auth, quota), so looping would only add latency to a request a
/// user is actively waiting on.
pub struct ModelDispatcher {
    text: Arc<dyn GenerateBackend>,
    image: Arc<dyn GenerateBackend>,
    image_fallback: Arc<dyn GenerateBackend>,
}

impl ModelDispatcher {
    pub fn new(
        text: Arc<dyn GenerateBackend>,
        image: Arc<dyn GenerateBackend>,
        image_fallback: Arc<dyn GenerateBackend>,
    ) -> Self {
        Self {
            text,
            image,
            image_fallback,
        }
    }

    pub async fn dispatch(&self, route: Route, prompt: &str) -> Result<DispatchResult, PrismError> {
        match route {
            Route::Text => match self.text.generate(prompt).await {
                Ok(content) => Ok(DispatchResult {
                    content,
                    model_used: self.text.model_id().to_string(),
                }),
                Err(cause) => Err(PrismError::Provider {
                    provider: self.text.model_id().to_string(),
                    cause,
                }),
            },

            Route::Image => {
                let primary_failure = match self.image.generate(prompt).await {
                    Ok(content) => {
                        return Ok(DispatchResult {
                            content,
                            model_used: self.image.model_id().to_string(),
                        });
                    }
                    Err(cause) => cause,
                };

                warn!(
                    primary = self.image.model_id(),
                    fallback = self.image_fallback.model_id(),
                    error = %primary_failure,
                    "primary image provider failed; trying fallback once"
                );

                match self.image_fallback.generate(prompt).await {
                    Ok(content) => Ok(DispatchResult {
                        content,
                        model_used: self.image_fallback.model_id().to_string(),
                    }),
                    Err(fallback_failure) => Err(PrismError::Provider {
                        provider: self.image_fallback.model_id().to_string(),
                        cause: ProviderFailure::Exhausted {
                            primary: Box::new(primary_failure),
                            fallback: Box::new(fallback_failure),
                        },
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        id: &'static str,
        outcome: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn ok(id: &'static str, content: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                outcome: Ok(content),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(id: &'static str, cause: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                outcome: Err(cause),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerateBackend for StubBackend {
        fn model_id(&self) -> &str {
            self.id
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Ok(content) => Ok(content.to_string()),
                Err(cause) => Err(ProviderFailure::Payload(cause.to_string())),
            }
        }
    }

    fn dispatcher(
        text: &Arc<StubBackend>,
        image: &Arc<StubBackend>,
        fallback: &Arc<StubBackend>,
    ) -> ModelDispatcher {
        ModelDispatcher::new(text.clone(), image.clone(), fallback.clone())
    }

    #[tokio::test]
    async fn text_route_uses_text_backend() {
        let text = StubBackend::ok("text-model", "hi");
        let image = StubBackend::ok("image-model", "img");
        let fallback = StubBackend::ok("fallback-model", "fb");

        let result = dispatcher(&text, &image, &fallback)
            .dispatch(Route::Text, "hello")
            .await
            .expect("dispatch failed");

        assert_eq!(result.content, "hi");
        assert_eq!(result.model_used, "text-model");
        assert_eq!(image.calls(), 0);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn text_failure_surfaces_without_fallback() {
        let text = StubBackend::failing("text-model", "quota");
        let image = StubBackend::ok("image-model", "img");
        let fallback = StubBackend::ok("fallback-model", "fb");

        let err = dispatcher(&text, &image, &fallback)
            .dispatch(Route::Text, "hello")
            .await
            .expect_err("expected provider error");

        match err {
            PrismError::Provider { provider, .. } => assert_eq!(provider, "text-model"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn image_primary_success_skips_fallback() {
        let text = StubBackend::ok("text-model", "hi");
        let image = StubBackend::ok("image-model", "img");
        let fallback = StubBackend::ok("fallback-model", "fb");

        let result = dispatcher(&text, &image, &fallback)
            .dispatch(Route::Image, "draw a cat")
            .await
            .expect("dispatch failed");

        assert_eq!(result.model_used, "image-model");
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn image_failure_engages_fallback_exactly_once() {
        let text = StubBackend::ok("text-model", "hi");
        let image = StubBackend::failing("image-model", "not whitelisted");
        let fallback = StubBackend::ok("fallback-model", "fb-content");

        let result = dispatcher(&text, &image, &fallback)
            .dispatch(Route::Image, "draw a cat")
            .await
            .expect("dispatch failed");

        assert_eq!(result.content, "fb-content");
        assert_eq!(result.model_used, "fallback-model");
        assert_eq!(image.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn exhausted_image_route_carries_both_causes() {
        let text = StubBackend::ok("text-model", "hi");
        let image = StubBackend::failing("image-model", "primary-cause");
        let fallback = StubBackend::failing("fallback-model", "fallback-cause");

        let err = dispatcher(&text, &image, &fallback)
            .dispatch(Route::Image, "draw a cat")
            .await
            .expect_err("expected provider error");

        match err {
            PrismError::Provider { provider, cause } => {
                assert_eq!(provider, "fallback-model");
                let rendered = cause.to_string();
                assert!(rendered.contains("primary-cause"), "missing primary cause: {rendered}");
                assert!(rendered.contains("fallback-cause"), "missing fallback cause: {rendered}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(image.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }
}
