//! Shared helpers for router integration tests: a scripted provider
//! standing in for Gemini, and app state over a temporary database.

#![allow(dead_code)]

use std::pin::Pin;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use futures_util::Stream;

use parley_api::state::{AppState, Services};
use parley_core::chat::service::ChatService;
use parley_core::llm::box_provider::BoxLlmProvider;
use parley_core::llm::provider::LlmProvider;
use parley_infra::sqlite::chat::SqliteChatRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_types::config::ChatConfig;
use parley_types::llm::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, StreamEvent,
};

/// Provider returning canned output instead of calling Gemini.
pub struct ScriptedProvider {
    reply: String,
    chunks: Vec<String>,
    fail: bool,
}

impl ScriptedProvider {
    /// Succeeds with `reply` on `complete`, and with `reply` split into
    /// whole-string chunks on `stream`.
    pub fn reply(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            chunks: vec![reply.to_string()],
            fail: false,
        }
    }

    /// Streams the given chunks in order; `complete` returns their
    /// concatenation.
    pub fn chunks(chunks: &[&str]) -> Self {
        Self {
            reply: chunks.concat(),
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            fail: false,
        }
    }

    /// Fails every request.
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            chunks: Vec::new(),
            fail: true,
        }
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        if self.fail {
            return Err(LlmError::Provider {
                message: "scripted failure".to_string(),
            });
        }
        Ok(CompletionResponse {
            content: self.reply.clone(),
            model: "scripted-model".to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    fn stream(
        &self,
        _request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        if self.fail {
            return Box::pin(futures_util::stream::iter(vec![Err(LlmError::Stream(
                "scripted failure".to_string(),
            ))]));
        }
        let mut events: Vec<Result<StreamEvent, LlmError>> = self
            .chunks
            .iter()
            .cloned()
            .map(|text| Ok(StreamEvent::TextDelta { text }))
            .collect();
        events.push(Ok(StreamEvent::Done));
        Box::pin(futures_util::stream::iter(events))
    }
}

/// Build app state over a fresh temporary database.
pub async fn test_state(provider: ScriptedProvider) -> AppState {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    // Leak tempdir so it lives for the test
    std::mem::forget(dir);
    let db_pool = DatabasePool::new(&url).await.unwrap();

    let services = Services {
        data_dir: std::env::temp_dir(),
        db_pool: db_pool.clone(),
        config: ChatConfig::default(),
        chat_service: Arc::new(ChatService::new(SqliteChatRepository::new(db_pool))),
    };

    AppState::new(&services, BoxLlmProvider::new(provider))
}

/// Build a JSON request.
pub fn json_request(method: &str, uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

/// Build a bodyless request.
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as text (for SSE responses).
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
