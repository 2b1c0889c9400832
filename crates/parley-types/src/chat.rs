//! Chat session and message types for Parley.
//!
//! A session is a time-boxed conversation container: it is created with a
//! TTL, receives messages while live, and is swept once its expiry passes.
//! Messages are append-only turns ordered by creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from the llm module (it is used in both chat and
// llm contexts).
pub use crate::llm::MessageRole;

/// A chat session with a fixed expiry.
///
/// `expires_at` is computed once at creation (`created_at + ttl`) and never
/// changes afterwards. `updated_at` is touched whenever a message is
/// appended. A session is usable iff `now <= expires_at`; expiry is a pure
/// function of the stored timestamp, evaluated lazily on each access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Whether the session has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// A single message within a chat session.
///
/// Messages are ordered by `created_at` within a session; reading them back
/// ascending reconstructs the conversation exactly as submitted. They are
/// never updated or deleted individually -- only removed transitively when
/// the owning session is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
