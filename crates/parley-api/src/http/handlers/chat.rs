//! Chat HTTP handlers: request/response and SSE streaming variants.
//!
//! POST /api/chat        - one-shot completion
//! POST /api/chat/stream - Server-Sent Events token stream
//!
//! Both variants share the same per-request sequence: validate the session,
//! validate the payload, persist the user turn, flatten the prior history
//! into a prompt, and call the provider singleton. The user turn is
//! persisted before generation, unconditionally; a provider failure leaves
//! it in place (no compensating rollback).
//!
//! Streaming frames:
//! - `data: {"chunk": "..."}` -- one frame per provider text delta
//! - `data: {"done": true}`   -- terminal frame, after the assistant
//!   message has been persisted
//! - `data: {"error": "..."}` -- emitted instead of `done` when the
//!   provider fails mid-stream; the partial reply is not persisted

use std::convert::Infallible;
use std::time::Duration;

use axum::Json as ResponseJson;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;

use parley_core::chat::image::{image_placeholder, parse_data_urls};
use parley_core::chat::prompt::build_prompt;
use parley_types::chat::ChatSession;
use parley_types::error::ChatError;
use parley_types::llm::{CompletionRequest, ImagePayload, StreamEvent};

use super::session::parse_session_id;
use crate::http::error::AppError;
use crate::http::extractors::Json;
use crate::state::AppState;

/// Request body for both chat endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: String,
    /// The user's message text. May be omitted when images are attached.
    #[serde(default)]
    pub message: Option<String>,
    /// Base64 data URLs, carried transiently and never persisted.
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// Response body for the non-streaming endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
}

/// A validated chat turn, ready to send to the provider.
struct PreparedTurn {
    session: ChatSession,
    request: CompletionRequest,
}

/// Run the shared leg of both chat variants: session check, payload
/// validation, history load, user-turn persistence, request building.
async fn prepare_turn(state: &AppState, body: &ChatRequest) -> Result<PreparedTurn, AppError> {
    let session_id = parse_session_id(&body.session_id)?;
    let session = state.chat_service.get_live_session(&session_id).await?;

    let text = body.message.as_deref().filter(|m| !m.is_empty());
    let data_urls = body.images.as_deref().unwrap_or_default();
    if text.is_none() && data_urls.is_empty() {
        return Err(ChatError::Validation(
            "either message or images must be provided".to_string(),
        )
        .into());
    }
    let images: Vec<ImagePayload> = parse_data_urls(data_urls).map_err(AppError::Chat)?;

    // History is loaded before the new turn is persisted, so it naturally
    // excludes it. The entire history is forwarded -- no windowing.
    let history = state.chat_service.get_messages(&session.id).await?;

    let content = text
        .map(str::to_string)
        .unwrap_or_else(|| image_placeholder(images.len()));
    state
        .chat_service
        .save_user_message(session.id, content)
        .await?;

    let request = CompletionRequest {
        model: state.config.model.clone(),
        prompt: build_prompt(&history, text.unwrap_or_default()),
        system: Some(state.config.system_prompt.clone()),
        images,
        max_tokens: state.config.max_output_tokens,
        temperature: Some(state.config.temperature),
    };

    Ok(PreparedTurn { session, request })
}

/// POST /api/chat - one-shot chat completion.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<ResponseJson<ChatResponse>, AppError> {
    let turn = prepare_turn(&state, &body).await?;

    let completion = state
        .provider
        .complete(&turn.request)
        .await
        .map_err(ChatError::Provider)?;

    let saved = state
        .chat_service
        .save_assistant_message(turn.session.id, completion.content.clone())
        .await?;

    Ok(ResponseJson(ChatResponse {
        response: completion.content,
        timestamp: saved.created_at.to_rfc3339(),
    }))
}

/// POST /api/chat/stream - SSE streaming chat.
///
/// Provider deltas are re-emitted as they arrive, without buffering. The
/// concatenated reply is persisted only after the provider stream
/// completes, then the terminal `done` frame is sent.
pub async fn stream_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let turn = prepare_turn(&state, &body).await?;

    let llm_stream = state.provider.stream(turn.request);
    let chat_service = state.chat_service.clone();
    let session_id = turn.session.id;

    let sse_stream = async_stream::stream! {
        let mut full_response = String::new();
        let mut had_error = false;

        let mut llm_stream = std::pin::pin!(llm_stream);

        while let Some(event_result) = llm_stream.next().await {
            match event_result {
                Ok(StreamEvent::TextDelta { text }) => {
                    let frame = serde_json::json!({ "chunk": &text });
                    yield Ok::<_, Infallible>(Event::default().data(frame.to_string()));
                    full_response.push_str(&text);
                }
                Ok(StreamEvent::Done) => break,
                Err(e) => {
                    tracing::error!(error = %e, session_id = %session_id, "provider stream failed");
                    let frame =
                        serde_json::json!({ "error": "Failed to generate AI response" });
                    yield Ok(Event::default().data(frame.to_string()));
                    had_error = true;
                    break;
                }
            }
        }

        if !had_error {
            if !full_response.is_empty() {
                if let Err(e) = chat_service
                    .save_assistant_message(session_id, full_response)
                    .await
                {
                    tracing::error!(
                        error = %e,
                        session_id = %session_id,
                        "failed to persist assistant message"
                    );
                }
            }

            yield Ok(Event::default().data(serde_json::json!({ "done": true }).to_string()));
        }
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
