//! Client error types

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Body of a non-success response
///
/// The backend reports failures as `{"detail": "..."}`; request validation
/// failures carry a list of `{"msg": "..."}` objects instead. Whatever the
/// shape, the raw text is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    detail: Option<String>,
    raw: String,
}

impl ErrorBody {
    pub fn parse(status: StatusCode, raw: String) -> Self {
        let detail = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|value| value.get("detail").and_then(detail_message));

        let raw = if raw.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or(status.as_str())
                .to_string()
        } else {
            raw
        };

        Self { detail, raw }
    }

    /// Message written by the server for the user, if any
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(message) => Some(message.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.detail().unwrap_or(&self.raw))
    }
}

/// Client error types
///
/// Cloneable so one failed query can be reported to every caller waiting
/// on it.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[source] Arc<reqwest::Error>),

    /// Server returned an error status
    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: ErrorBody },

    /// Invalid credentials or rejected token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(ErrorBody),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(ErrorBody),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(ErrorBody),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(ErrorBody),

    /// Request body failed server-side validation
    #[error("Invalid request: {0}")]
    Unprocessable(ErrorBody),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[source] Arc<serde_json::Error>),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(Arc::new(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}

impl ClientError {
    /// Create error from HTTP status code and response text
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let body = ErrorBody::parse(status, message);
        match status.as_u16() {
            400 => Self::BadRequest(body),
            401 => Self::AuthenticationFailed(body),
            403 => Self::Forbidden(body),
            404 => Self::NotFound(body),
            422 => Self::Unprocessable(body),
            _ => Self::ServerError {
                status: status.as_u16(),
                body,
            },
        }
    }

    fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::ServerError { body, .. }
            | Self::AuthenticationFailed(body)
            | Self::NotFound(body)
            | Self::BadRequest(body)
            | Self::Forbidden(body)
            | Self::Unprocessable(body) => Some(body),
            _ => None,
        }
    }

    /// Server-provided `detail` message, if the response carried one
    pub fn detail(&self) -> Option<&str> {
        self.body().and_then(ErrorBody::detail)
    }

    /// HTTP status of the failed response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            Self::AuthenticationFailed(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::Forbidden(_) => Some(403),
            Self::Unprocessable(_) => Some(422),
            Self::Request(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Whether the credentials or the bearer token were rejected
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}
