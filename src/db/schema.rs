//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `users` table (one identity per row, usernames unique)
/// - `chat_records` table (append-only exchange log; rows are never updated
///   or deleted, which keeps concurrent readers race-free and preserves the
///   audit trail)
///
/// The composite index serves both history queries: records for a
/// (user, session) in timestamp order, and distinct sessions for a user
/// ordered by latest activity.
pub const SQLITE_INIT: &str = r"
-- ---------------------------------------------------------------------------
-- Users (credential store)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

-- ---------------------------------------------------------------------------
-- Chat records (append-only session history)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS chat_records (
    id INTEGER PRIMARY KEY NOT NULL,
    user_id INTEGER NOT NULL REFERENCES users(id),
    session_id TEXT NOT NULL,
    prompt TEXT NOT NULL,
    response TEXT NOT NULL,
    model_used TEXT NOT NULL,
    timestamp TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_chat_records_user_session_ts
    ON chat_records(user_id, session_id, timestamp);
";
