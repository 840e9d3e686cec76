use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error as ThisError;

/// Max characters of an upstream error body kept for diagnostics.
pub const BODY_PREVIEW_CHARS: usize = 300;

/// Why a provider call produced no content.
///
/// `Exhausted` is dispatcher-level: the image primary failed and the single
/// fallback attempt failed too, and both causes are kept for diagnostics.
#[derive(Debug, ThisError)]
pub enum ProviderFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("upstream status {status}: {body_preview}")]
    Status {
        status: StatusCode,
        body_preview: String,
    },

    #[error("malformed upstream payload: {0}")]
    Payload(String),

    #[error("primary failed ({primary}); fallback failed ({fallback})")]
    Exhausted {
        primary: Box<ProviderFailure>,
        fallback: Box<ProviderFailure>,
    },
}

impl ProviderFailure {
    /// Splits reqwest's timeout flavor out of its transport error so the
    /// enforced per-call deadline shows up by name.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProviderFailure::Timeout(timeout)
        } else {
            ProviderFailure::Transport(err)
        }
    }

    /// Consumes a non-2xx response into a status failure with a bounded
    /// body preview.
    pub(crate) async fn from_status(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        ProviderFailure::Status {
            status,
            body_preview: format!("{:.len$}", body, len = BODY_PREVIEW_CHARS),
        }
    }
}
