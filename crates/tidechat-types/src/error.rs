use thiserror::Error;

/// Errors from repository operations (used by trait definitions in tidechat-core).
///
/// `NotFound` is a distinguishable kind: the conversation resolver keys on it
/// to trigger creation. Every other variant is fatal for the request.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the chat service layer.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("conversation not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::NotFound,
            other => ChatError::Storage(other.to_string()),
        }
    }
}
