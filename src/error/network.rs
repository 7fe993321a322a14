//! Errors from calls to the backend API.

use thiserror::Error;

use crate::traits::{CookieError, HttpError};

/// Backend API call error.
///
/// Cloneable so test doubles can hand the same failure out repeatedly.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    /// Server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request body could not be serialized.
    #[error("could not encode request: {0}")]
    Encode(String),

    /// Cookie jar could not be read or written.
    #[error("cookie store error: {0}")]
    Cookies(#[from] CookieError),
}

impl ApiError {
    /// Build a status error, preferring the `message` field of a JSON body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| match value.get("message") {
                Some(serde_json::Value::String(msg)) => Some(msg.clone()),
                Some(serde_json::Value::Array(items)) => Some(
                    items
                        .iter()
                        .filter_map(|item| item.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                _ => None,
            })
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    trimmed.chars().take(200).collect()
                }
            });
        ApiError::Status { status, message }
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(HttpError::ConnectionFailed(_))
            | ApiError::Transport(HttpError::Timeout(_)) => true,
            ApiError::Transport(_) => false,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            ApiError::InvalidResponse(_) | ApiError::Encode(_) | ApiError::Cookies(_) => false,
        }
    }

    /// Check if signing in again might resolve this error.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(HttpError::Timeout(_)) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            ApiError::Transport(_) => {
                "Unable to connect to the server. Please check your connection.".to_string()
            }
            ApiError::Status { status, message } => match *status {
                400 => format!("The request was rejected: {}", message),
                401 => "Invalid credentials or expired session. Please sign in again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "The server is experiencing issues. Please try again later.".to_string(),
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            ApiError::InvalidResponse(_) => {
                "The server sent a response that could not be understood.".to_string()
            }
            ApiError::Encode(_) => "The request could not be prepared.".to_string(),
            ApiError::Cookies(_) => "The local session store could not be accessed.".to_string(),
        }
    }
}
