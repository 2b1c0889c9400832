//! Chat service orchestrating session lifecycle and message persistence.
//!
//! ChatService coordinates session creation with TTL, lazy expiry checks,
//! the out-of-band cleanup sweep, and append-only message persistence.
//! Generic over `ChatRepository` to keep the clean-architecture rule
//! (parley-core never depends on parley-infra).

use chrono::{Duration, Utc};
use parley_types::chat::{ChatMessage, ChatSession, MessageRole};
use parley_types::error::{ChatError, RepositoryError};
use tracing::info;
use uuid::Uuid;

use crate::chat::repository::ChatRepository;

/// Default session time-to-live, in hours.
pub const DEFAULT_SESSION_TTL_HOURS: u32 = 24;

/// Default window for recent-message queries.
pub const DEFAULT_RECENT_MESSAGE_LIMIT: i64 = 50;

/// Orchestrates chat session lifecycle and message persistence.
pub struct ChatService<R: ChatRepository> {
    repo: R,
}

impl<R: ChatRepository> ChatService<R> {
    /// Create a new chat service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // --- Session lifecycle ---

    /// Create a new session expiring `ttl_hours` from now (default 24).
    ///
    /// `expires_at` is set once here and never updated afterwards.
    pub async fn create_session(
        &self,
        ttl_hours: Option<u32>,
    ) -> Result<ChatSession, RepositoryError> {
        let ttl = ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        let now = Utc::now();
        let session = ChatSession {
            id: Uuid::now_v7(),
            created_at: now,
            expires_at: now + Duration::hours(i64::from(ttl)),
            updated_at: now,
        };

        let created = self.repo.create_session(&session).await?;
        info!(session_id = %created.id, expires_at = %created.expires_at, "session created");
        Ok(created)
    }

    /// Get a session by ID, without an expiry check.
    pub async fn get_session(
        &self,
        session_id: &Uuid,
    ) -> Result<Option<ChatSession>, RepositoryError> {
        self.repo.get_session(session_id).await
    }

    /// Get a session that is guaranteed usable.
    ///
    /// Absence and expiry are treated identically: both yield
    /// `ChatError::SessionNotFound`.
    pub async fn get_live_session(&self, session_id: &Uuid) -> Result<ChatSession, ChatError> {
        match self.repo.get_session(session_id).await? {
            Some(session) if !session.is_expired_at(Utc::now()) => Ok(session),
            _ => Err(ChatError::SessionNotFound),
        }
    }

    /// Whether the session is expired. True for non-existent ids.
    pub async fn is_expired(&self, session_id: &Uuid) -> Result<bool, RepositoryError> {
        Ok(match self.repo.get_session(session_id).await? {
            Some(session) => session.is_expired_at(Utc::now()),
            None => true,
        })
    }

    /// Delete a session and its messages.
    pub async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        self.repo.delete_session(session_id).await
    }

    /// Sweep all sessions whose expiry has passed, returning the count
    /// removed.
    ///
    /// Intended to be invoked out-of-band (the `cleanup` CLI command or a
    /// scheduled job), never from the request path.
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, RepositoryError> {
        let removed = self.repo.delete_expired_sessions(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "expired sessions swept");
        }
        Ok(removed)
    }

    // --- Message persistence ---

    /// Append a user turn to a session.
    pub async fn save_user_message(
        &self,
        session_id: Uuid,
        content: String,
    ) -> Result<ChatMessage, RepositoryError> {
        self.save_message(session_id, MessageRole::User, content)
            .await
    }

    /// Append an assistant turn to a session.
    pub async fn save_assistant_message(
        &self,
        session_id: Uuid,
        content: String,
    ) -> Result<ChatMessage, RepositoryError> {
        self.save_message(session_id, MessageRole::Assistant, content)
            .await
    }

    async fn save_message(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: String,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = ChatMessage {
            id: Uuid::now_v7(),
            session_id,
            role,
            content,
            created_at: Utc::now(),
        };

        self.repo.save_message(&message).await?;
        Ok(message)
    }

    /// All messages for a session in chronological order.
    pub async fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.repo.get_messages(session_id).await
    }

    /// Most recent messages, newest first, truncated to `limit`
    /// (default 50). Callers wanting chronological order must reverse.
    pub async fn get_recent_messages(
        &self,
        session_id: &Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.repo
            .get_recent_messages(session_id, limit.unwrap_or(DEFAULT_RECENT_MESSAGE_LIMIT))
            .await
    }

    /// Total session count (status dashboard).
    pub async fn count_sessions(&self) -> Result<u64, RepositoryError> {
        self.repo.count_sessions().await
    }

    /// Total message count (status dashboard).
    pub async fn count_messages(&self) -> Result<u64, RepositoryError> {
        self.repo.count_messages().await
    }
}
