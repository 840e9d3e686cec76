use crate::auth::TokenAuthority;
use crate::classify::PromptClassifier;
use crate::config::Config;
use crate::db::DbHandle;
use crate::providers::{ImageClient, KeylessImageClient, ModelDispatcher, TextClient};
use crate::server::routes::{auth, chat, history};

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use base64::Engine as _;
use rand::RngCore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Shared per-request state: every handle here is read-only after startup,
/// so concurrent request tasks need no coordination beyond the database
/// actor's mailbox.
#[derive(Clone)]
pub struct PrismState {
    pub db: DbHandle,
    pub authority: Arc<TokenAuthority>,
    pub classifier: Arc<PromptClassifier>,
    pub dispatcher: Arc<ModelDispatcher>,
}

impl PrismState {
    pub fn new(cfg: &Config, db: DbHandle) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("prism/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        let dispatcher = ModelDispatcher::new(
            Arc::new(TextClient::new(&cfg.providers.text, client.clone())),
            Arc::new(ImageClient::new(&cfg.providers.image, client.clone())),
            Arc::new(KeylessImageClient::new(
                &cfg.providers.image_fallback,
                client,
            )),
        );

        Self {
            db,
            authority: Arc::new(TokenAuthority::new(&cfg.auth)),
            classifier: Arc::new(PromptClassifier::new(&cfg.classifier)),
            dispatcher: Arc::new(dispatcher),
        }
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    // Always reflect `x-request-id` for easier correlation, even if the client didn't send one.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn prism_router(state: PrismState) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::issue_token))
        .route("/chat", post(chat::chat))
        .route("/sessions", get(history::list_sessions))
        .route("/history/{session_id}", get(history::session_history))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
