//! ChatRepository trait definition.
//!
//! Provides CRUD operations for chat sessions and messages. Implementations
//! live in parley-infra (e.g., `SqliteChatRepository`). Uses native async fn
//! in traits (RPITIT, Rust 2024 edition).

use chrono::{DateTime, Utc};
use parley_types::chat::{ChatMessage, ChatSession};
use parley_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat session and message persistence.
pub trait ChatRepository: Send + Sync {
    /// Create a new chat session.
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Get a chat session by its unique ID.
    fn get_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Delete a chat session and, transitively, its messages.
    fn delete_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Bulk-delete every session whose expiry is strictly before `cutoff`.
    /// Returns the number of sessions removed.
    fn delete_expired_sessions(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Save a new message within a session.
    ///
    /// No foreign-key existence check beyond the schema constraint is
    /// performed here; callers validate the session first. Touches the
    /// owning session's `updated_at`.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get all messages for a session, ordered by created_at ASC, unbounded.
    fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Get the most recent messages for a session, ordered by created_at
    /// DESC and truncated to `limit`. Callers wanting chronological order
    /// must reverse the result.
    fn get_recent_messages(
        &self,
        session_id: &Uuid,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Count total sessions.
    fn count_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count total messages across all sessions.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
