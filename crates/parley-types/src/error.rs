use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in parley-core).
///
/// `Connection` is kept distinct from `Query` so an unreachable database
/// (DNS/connection failure) surfaces with clearer diagnostics than an
/// ordinary failed statement.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from the chat request path.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Session is absent or past its expiry. Callers treat both identically.
    #[error("session not found or expired")]
    SessionNotFound,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("failed to generate response")]
    Provider(#[source] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_from_repository_error() {
        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(
            err,
            ChatError::Storage(RepositoryError::Connection)
        ));
    }

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::Validation("message must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "validation error: message must not be empty"
        );
        assert_eq!(
            ChatError::SessionNotFound.to_string(),
            "session not found or expired"
        );
    }
}
