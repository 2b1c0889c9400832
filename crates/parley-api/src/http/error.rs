//! Application error type mapping to HTTP status codes.
//!
//! Every failure is converted at the request boundary to a JSON
//! `{"error": "...", "details"?: "..."}` body; nothing propagates
//! unhandled, and no retries are performed anywhere.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{ChatError, RepositoryError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat request path errors (not found, validation, storage, provider).
    Chat(ChatError),
    /// Malformed request body or parameters.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Chat(ChatError::Storage(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::Chat(ChatError::SessionNotFound) => (
                StatusCode::NOT_FOUND,
                "Session not found or expired".to_string(),
                None,
            ),
            AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            AppError::Chat(ChatError::Storage(RepositoryError::Connection)) => {
                tracing::error!("database unreachable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database connection failed".to_string(),
                    None,
                )
            }
            AppError::Chat(ChatError::Storage(RepositoryError::NotFound)) => {
                (StatusCode::NOT_FOUND, "Not found".to_string(), None)
            }
            AppError::Chat(ChatError::Storage(RepositoryError::Query(msg))) => {
                tracing::error!(error = %msg, "storage query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal storage error".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Chat(ChatError::Provider(e)) => {
                tracing::error!(error = %e, "provider generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate AI response".to_string(),
                    None,
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let body = match details {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
