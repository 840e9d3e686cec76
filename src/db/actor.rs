use crate::db::models::{DbChatRecord, DbUser, NewChatRecord, NewUser};
use crate::db::schema::SQLITE_INIT;
use crate::error::PrismError;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

#[derive(Debug)]
pub enum DbMessage {
    /// Create a user record and return its id. Duplicate usernames fail.
    CreateUser(NewUser, RpcReplyPort<Result<i64, PrismError>>),

    /// Look up a user by username (case-sensitive).
    FindUser(String, RpcReplyPort<Result<Option<DbUser>, PrismError>>),

    /// Append one exchange to the history log and return the record id.
    AppendChat(NewChatRecord, RpcReplyPort<Result<i64, PrismError>>),

    /// Distinct session ids for a user, most recently active first.
    ListSessions(i64, RpcReplyPort<Result<Vec<String>, PrismError>>),

    /// All records for one (user, session), oldest first.
    SessionHistory(
        i64,
        String,
        RpcReplyPort<Result<Vec<DbChatRecord>, PrismError>>,
    ),
}

/// Cloneable RPC handle to the database actor.
///
/// The actor is the single writer: every insert goes through its mailbox, so
/// id assignment is strictly increasing and concurrent appends to the same
/// session cannot interleave partially.
#[derive(Clone)]
pub struct DbHandle {
    actor: ActorRef<DbMessage>,
}

impl DbHandle {
    pub async fn create_user(&self, user: NewUser) -> Result<i64, PrismError> {
        ractor::call!(self.actor, DbMessage::CreateUser, user)
            .map_err(|e| PrismError::Rpc(format!("DbActor CreateUser RPC failed: {e}")))?
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<DbUser>, PrismError> {
        ractor::call!(self.actor, DbMessage::FindUser, username.to_string())
            .map_err(|e| PrismError::Rpc(format!("DbActor FindUser RPC failed: {e}")))?
    }

    pub async fn append_chat(&self, record: NewChatRecord) -> Result<i64, PrismError> {
        ractor::call!(self.actor, DbMessage::AppendChat, record)
            .map_err(|e| PrismError::Rpc(format!("DbActor AppendChat RPC failed: {e}")))?
    }

    pub async fn list_sessions(&self, user_id: i64) -> Result<Vec<String>, PrismError> {
        ractor::call!(self.actor, DbMessage::ListSessions, user_id)
            .map_err(|e| PrismError::Rpc(format!("DbActor ListSessions RPC failed: {e}")))?
    }

    pub async fn session_history(
        &self,
        user_id: i64,
        session_id: &str,
    ) -> Result<Vec<DbChatRecord>, PrismError> {
        ractor::call!(
            self.actor,
            DbMessage::SessionHistory,
            user_id,
            session_id.to_string()
        )
        .map_err(|e| PrismError::Rpc(format!("DbActor SessionHistory RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbMessage::CreateUser(user, reply) => {
                let res = self.create_user(&state.pool, user).await;
                let _ = reply.send(res);
            }
            DbMessage::FindUser(username, reply) => {
                let res = self.find_user(&state.pool, &username).await;
                let _ = reply.send(res);
            }
            DbMessage::AppendChat(record, reply) => {
                let res = self.append_chat(&state.pool, record).await;
                let _ = reply.send(res);
            }
            DbMessage::ListSessions(user_id, reply) => {
                let res = self.list_sessions(&state.pool, user_id).await;
                let _ = reply.send(res);
            }
            DbMessage::SessionHistory(user_id, session_id, reply) => {
                let res = self.session_history(&state.pool, user_id, &session_id).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn create_user(&self, pool: &SqlitePool, user: NewUser) -> Result<i64, PrismError> {
        let now = Utc::now();
        let result: Result<i64, sqlx::Error> = sqlx::query_scalar(
            r"
        INSERT INTO users (username, password_hash, created_at)
        VALUES (?, ?, ?)
        RETURNING id
        ",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(now)
        .fetch_one(pool)
        .await;

        match result {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(PrismError::DuplicateUsername(user.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(
        &self,
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<DbUser>, PrismError> {
        let row = sqlx::query_as::<_, DbUser>(
            r"
        SELECT id, username, password_hash, created_at
        FROM users
        WHERE username = ?
        ",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// One atomic INSERT: either the whole record exists afterwards or none
    /// of it does. The timestamp is assigned here, inside the single writer,
    /// so it reflects real append order within a session.
    async fn append_chat(
        &self,
        pool: &SqlitePool,
        record: NewChatRecord,
    ) -> Result<i64, PrismError> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r"
        INSERT INTO chat_records (user_id, session_id, prompt, response, model_used, timestamp)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        ",
        )
        .bind(record.user_id)
        .bind(&record.session_id)
        .bind(&record.prompt)
        .bind(&record.response)
        .bind(&record.model_used)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    async fn list_sessions(
        &self,
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<String>, PrismError> {
        let rows: Vec<String> = sqlx::query_scalar(
            r"
        SELECT session_id
        FROM chat_records
        WHERE user_id = ?
        GROUP BY session_id
        ORDER BY MAX(timestamp) DESC
        ",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn session_history(
        &self,
        pool: &SqlitePool,
        user_id: i64,
        session_id: &str,
    ) -> Result<Vec<DbChatRecord>, PrismError> {
        let rows = sqlx::query_as::<_, DbChatRecord>(
            r"
        SELECT id, user_id, session_id, prompt, response, model_used, timestamp
        FROM chat_records
        WHERE user_id = ? AND session_id = ?
        ORDER BY timestamp ASC, id ASC
        ",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> DbHandle {
    let (actor, _jh) = ractor::Actor::spawn(
        Some("DbActor".to_string()),
        DbActor,
        database_url.to_string(),
    )
    .await
    .expect("failed to spawn DbActor");

    DbHandle { actor }
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), PrismError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
