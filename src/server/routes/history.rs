use axum::{
    Json,
    extract::{Path, State},
};

use crate::db::DbChatRecord;
use crate::error::PrismError;
use crate::server::guards::auth::AuthedUser;
use crate::server::router::PrismState;

/// `GET /sessions`: distinct session ids for the caller, most recently
/// active first. Re-querying reflects current state, not a frozen snapshot.
pub async fn list_sessions(
    State(state): State<PrismState>,
    AuthedUser(user_id): AuthedUser,
) -> Result<Json<Vec<String>>, PrismError> {
    let sessions = state.db.list_sessions(user_id).await?;
    Ok(Json(sessions))
}

/// `GET /history/{session_id}`: all records of one session in conversational
/// order (oldest first). The session id is scoped to the authenticated user;
/// asking for someone else's session id just yields an empty list.
pub async fn session_history(
    State(state): State<PrismState>,
    AuthedUser(user_id): AuthedUser,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<DbChatRecord>>, PrismError> {
    let records = state.db.session_history(user_id, &session_id).await?;
    Ok(Json(records))
}
