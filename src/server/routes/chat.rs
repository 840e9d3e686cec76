use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::classify::ModeHint;
use crate::db::NewChatRecord;
use crate::error::PrismError;
use crate::server::guards::auth::AuthedUser;
use crate::server::router::PrismState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,

    /// Explicit routing intent; `auto` (the default) defers to keyword
    /// inference.
    #[serde(default)]
    pub mode: ModeHint,

    /// Opaque grouping key for related exchanges. Generated when absent and
    /// echoed back so the caller can keep the conversation going.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub model_used: String,
    pub session_id: String,
}

/// `POST /chat`: classify, dispatch, persist, answer.
///
/// The append happens only after a successful dispatch, and a storage
/// failure fails the whole request: a response the caller saw but the log
/// never recorded would corrupt the history invariant. If the client
/// disconnects mid-dispatch the handler future is dropped before the append,
/// so partial exchanges are never persisted.
pub async fn chat(
    State(state): State<PrismState>,
    AuthedUser(user_id): AuthedUser,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, PrismError> {
    let session_id = req
        .session_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let route = state.classifier.classify(&req.prompt, req.mode);
    debug!(user_id, %session_id, ?route, "dispatching prompt");

    let result = state.dispatcher.dispatch(route, &req.prompt).await?;

    state
        .db
        .append_chat(NewChatRecord {
            user_id,
            session_id: session_id.clone(),
            prompt: req.prompt,
            response: result.content.clone(),
            model_used: result.model_used.clone(),
        })
        .await?;

    Ok(Json(ChatResponse {
        response: result.content,
        model_used: result.model_used,
        session_id,
    }))
}
