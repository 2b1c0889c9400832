//! Session and message HTTP handlers.
//!
//! Endpoints:
//! - POST /api/sessions               - Create a session (201)
//! - GET  /api/sessions/{id}          - Get a session, 404 if expired/absent
//! - GET  /api/messages/{session_id}  - List messages, 404 if expired/absent

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use parley_types::chat::ChatMessage;
use parley_types::error::ChatError;
use parley_types::llm::MessageRole;

use crate::http::error::AppError;
use crate::state::AppState;

/// Body of `POST /api/sessions`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub expires_at: String,
}

/// Body of `GET /api/sessions/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: String,
    pub expires_at: String,
}

/// Body of `GET /api/messages/{session_id}`.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<MessageDto>,
}

/// One message as exposed over the API.
#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

impl From<ChatMessage> for MessageDto {
    fn from(msg: ChatMessage) -> Self {
        Self {
            id: msg.id,
            role: msg.role,
            content: msg.content,
            timestamp: msg.created_at.to_rfc3339(),
        }
    }
}

/// Parse a session id from a path or body string.
///
/// An unparseable id is indistinguishable from an absent session to
/// callers, so it maps to the same 404 as expiry.
pub fn parse_session_id(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s).map_err(|_| AppError::Chat(ChatError::SessionNotFound))
}

/// POST /api/sessions - Create a new session with the configured TTL.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), AppError> {
    let session = state
        .chat_service
        .create_session(Some(state.config.session_ttl_hours))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: session.id,
            expires_at: session.expires_at.to_rfc3339(),
        }),
    ))
}

/// GET /api/sessions/{id} - Get a session if it is still usable.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = parse_session_id(&id)?;
    let session = state.chat_service.get_live_session(&session_id).await?;

    Ok(Json(SessionResponse {
        session_id: session.id,
        created_at: session.created_at.to_rfc3339(),
        expires_at: session.expires_at.to_rfc3339(),
    }))
}

/// GET /api/messages/{session_id} - List a session's messages in
/// chronological order.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<MessagesResponse>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let session = state.chat_service.get_live_session(&session_id).await?;

    let messages = state.chat_service.get_messages(&session.id).await?;

    Ok(Json(MessagesResponse {
        messages: messages.into_iter().map(MessageDto::from).collect(),
    }))
}
