//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, RFC 3339 TEXT
//! timestamps.

use chrono::{DateTime, Utc};
use parley_core::chat::repository::ChatRepository;
use parley_types::chat::{ChatMessage, ChatSession};
use parley_types::error::RepositoryError;
use parley_types::llm::MessageRole;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain ChatSession.
struct ChatSessionRow {
    id: String,
    created_at: String,
    expires_at: String,
    updated_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;

        Ok(ChatSession {
            id,
            created_at: parse_datetime(&self.created_at)?,
            expires_at: parse_datetime(&self.expires_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
struct ChatMessageRow {
    id: String,
    session_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| RepositoryError::Query(format!("invalid session_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id,
            session_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Map sqlx errors, keeping connectivity failures distinct from ordinary
/// query failures so an unreachable database is diagnosable.
fn map_sqlx_err(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => RepositoryError::Connection,
        other => RepositoryError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_sessions (id, created_at, expires_at, updated_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.expires_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_err)?;

        Ok(session.clone())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_err)?;

        match row {
            Some(row) => {
                let session_row = ChatSessionRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_expired_sessions(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE expires_at < ?")
            .bind(format_datetime(&cutoff))
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        // Insert the message
        sqlx::query(
            r#"INSERT INTO chat_messages (id, session_id, role, content, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_err)?;

        // Touch the session's last-modified timestamp
        sqlx::query("UPDATE chat_sessions SET updated_at = ? WHERE id = ?")
            .bind(format_datetime(&message.created_at))
            .bind(message.session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn get_recent_messages(
        &self,
        session_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(session_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn count_sessions(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_sessions")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_err)?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_err)?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;
    use chrono::Duration;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_session(ttl_hours: i64) -> ChatSession {
        let now = Utc::now();
        ChatSession {
            id: Uuid::now_v7(),
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours),
            updated_at: now,
        }
    }

    fn make_message(session_id: Uuid, role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage {
            id: Uuid::now_v7(),
            session_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let session = make_session(24);
        let created = repo.create_session(&session).await.unwrap();
        assert_eq!(created.id, session.id);

        let found = repo.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.created_at, session.created_at);
        assert_eq!(found.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn test_get_session_missing_is_none() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let found = repo.get_session(&Uuid::now_v7()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_session_cascades_messages() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let session = make_session(24);
        repo.create_session(&session).await.unwrap();

        let msg = make_message(session.id, MessageRole::User, "Hello");
        repo.save_message(&msg).await.unwrap();

        repo.delete_session(&session.id).await.unwrap();

        let found = repo.get_session(&session.id).await.unwrap();
        assert!(found.is_none());

        let messages = repo.get_messages(&session.id).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_session_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let err = repo.delete_session(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_expired_sessions_removes_only_expired() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        // Two sessions already past expiry, one live.
        for _ in 0..2 {
            let now = Utc::now();
            let stale = ChatSession {
                id: Uuid::now_v7(),
                created_at: now - Duration::hours(48),
                expires_at: now - Duration::hours(24),
                updated_at: now - Duration::hours(48),
            };
            repo.create_session(&stale).await.unwrap();
        }
        let live = make_session(24);
        repo.create_session(&live).await.unwrap();

        let removed = repo.delete_expired_sessions(Utc::now()).await.unwrap();
        assert_eq!(removed, 2);

        assert!(repo.get_session(&live.id).await.unwrap().is_some());
        assert_eq!(repo.count_sessions().await.unwrap(), 1);

        // Nothing left to sweep.
        let removed = repo.delete_expired_sessions(Utc::now()).await.unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_messages_sorted_ascending_regardless_of_insertion_order() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let session = make_session(24);
        repo.create_session(&session).await.unwrap();

        // Insert out of chronological order.
        let base = Utc::now();
        let mut third = make_message(session.id, MessageRole::User, "third");
        third.created_at = base + Duration::seconds(2);
        let mut first = make_message(session.id, MessageRole::User, "first");
        first.created_at = base;
        let mut second = make_message(session.id, MessageRole::Assistant, "second");
        second.created_at = base + Duration::seconds(1);

        repo.save_message(&third).await.unwrap();
        repo.save_message(&first).await.unwrap();
        repo.save_message(&second).await.unwrap();

        let messages = repo.get_messages(&session.id).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_recent_messages_descending_with_limit() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let session = make_session(24);
        repo.create_session(&session).await.unwrap();

        let base = Utc::now();
        for i in 0..5 {
            let mut msg = make_message(session.id, MessageRole::User, &format!("msg {i}"));
            msg.created_at = base + Duration::seconds(i);
            repo.save_message(&msg).await.unwrap();
        }

        let recent = repo.get_recent_messages(&session.id, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "msg 4");
        assert_eq!(recent[1].content, "msg 3");
    }

    #[tokio::test]
    async fn test_save_message_touches_session_updated_at() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let session = make_session(24);
        repo.create_session(&session).await.unwrap();

        let mut msg = make_message(session.id, MessageRole::User, "Hello");
        msg.created_at = session.updated_at + Duration::seconds(30);
        repo.save_message(&msg).await.unwrap();

        let found = repo.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(found.updated_at, msg.created_at);
        // Expiry never moves.
        assert_eq!(found.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn test_counts() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        assert_eq!(repo.count_sessions().await.unwrap(), 0);
        assert_eq!(repo.count_messages().await.unwrap(), 0);

        let session = make_session(24);
        repo.create_session(&session).await.unwrap();
        repo.save_message(&make_message(session.id, MessageRole::User, "Hello"))
            .await
            .unwrap();
        repo.save_message(&make_message(session.id, MessageRole::Assistant, "Hi"))
            .await
            .unwrap();

        assert_eq!(repo.count_sessions().await.unwrap(), 1);
        assert_eq!(repo.count_messages().await.unwrap(), 2);
    }
}
