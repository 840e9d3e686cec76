use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identity record. Created once at registration, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Immutable fact of one exchange. A session is not a stored entity; it is
/// the set of records sharing one (`user_id`, `session_id`) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct DbChatRecord {
    pub id: i64,
    pub user_id: i64,
    pub session_id: String,
    pub prompt: String,
    pub response: String,
    /// Which backend actually answered: the text model, the primary image
    /// model, or the fallback. Must be accurate for audit purposes.
    pub model_used: String,
    pub timestamp: DateTime<Utc>,
}

/// Insert payload for `users`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Insert payload for `chat_records`; id and timestamp are assigned by the
/// store at append time.
#[derive(Debug, Clone)]
pub struct NewChatRecord {
    pub user_id: i64,
    pub session_id: String,
    pub prompt: String,
    pub response: String,
    pub model_used: String,
}
