use codemarket_core::ValidationErrors;
use codemarket_http::{ClientError, StorageError};
use thiserror::Error;

/// Failures surfaced by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend rejected the request or could not be reached
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Input was rejected before any request was sent
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Tokens could not be persisted
    #[error("Token storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The signed-in user lacks the role the operation needs
    #[error("{0}")]
    Forbidden(String),

    #[error("Not signed in")]
    NotAuthenticated,
}

impl SessionError {
    /// Server-provided message, if the backend sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Client(err) => err.detail(),
            _ => None,
        }
    }

    /// Text to show the user: the server detail when present, otherwise
    /// `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Client(err) => err.detail().unwrap_or(fallback).to_string(),
            Self::Validation(errors) => errors.to_string(),
            Self::Forbidden(message) => message.clone(),
            Self::Storage(_) | Self::NotAuthenticated => fallback.to_string(),
        }
    }
}
