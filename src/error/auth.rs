//! Authentication-related error types.

use thiserror::Error;

use super::{ApiError, TokenDecodeError};
use crate::traits::CookieError;

/// Authentication-specific error variants.
///
/// Only sign-in failures and guard violations reach callers; sign-out and
/// refresh failures are logged and absorbed by the session manager.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Backend rejected or failed the sign-in request.
    #[error("sign-in failed: {0}")]
    SignInFailed(#[source] ApiError),

    /// A token cookie was present but malformed.
    #[error("malformed token cookie: {0}")]
    Token(#[from] TokenDecodeError),

    /// The cookie jar could not be read.
    #[error("cookie store unavailable: {0}")]
    CookieStore(#[from] CookieError),

    /// An action was invoked on a context with no session manager behind it.
    #[error("no session provider is mounted")]
    ProviderUnavailable,

    /// The session manager was closed and no longer accepts actions.
    #[error("session manager is closed")]
    Closed,
}

impl AuthError {
    /// Check if this error might be resolved by signing in again.
    pub fn requires_reauth(&self) -> bool {
        match self {
            AuthError::SignInFailed(err) => err.requires_reauth(),
            AuthError::Token(_) => true,
            AuthError::CookieStore(_) | AuthError::ProviderUnavailable | AuthError::Closed => false,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::SignInFailed(_) => "E_AUTH_SIGN_IN",
            AuthError::Token(_) => "E_AUTH_TOKEN",
            AuthError::CookieStore(_) => "E_AUTH_COOKIES",
            AuthError::ProviderUnavailable => "E_AUTH_NO_PROVIDER",
            AuthError::Closed => "E_AUTH_CLOSED",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::SignInFailed(err) => err.user_message(),
            AuthError::Token(_) => "Your saved session is corrupted. Please sign in again.".to_string(),
            AuthError::CookieStore(_) => {
                "The local session store could not be accessed.".to_string()
            }
            AuthError::ProviderUnavailable | AuthError::Closed => {
                "Authentication is not available right now.".to_string()
            }
        }
    }
}
