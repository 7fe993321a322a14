//! Error types for pointwatch.
//!
//! - [`TokenDecodeError`]: a token cookie is present but malformed
//! - [`ApiError`]: a backend call failed (transport, status, body shape)
//! - [`AuthError`]: what session actions report to their callers
//!
//! Absent cookies are never errors. Sign-out and refresh failures are
//! logged and absorbed; everything degrades to "not authenticated".

mod auth;
mod network;
mod token;

pub use auth::AuthError;
pub use network::ApiError;
pub use token::TokenDecodeError;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::traits::{CookieError, HttpError};

    #[test]
    fn test_conversions_into_auth_error() {
        let token: AuthError = TokenDecodeError::MissingMessage.into();
        assert!(matches!(token, AuthError::Token(_)));

        let cookies: AuthError = CookieError::Io("denied".to_string()).into();
        assert!(matches!(cookies, AuthError::CookieStore(_)));
    }

    #[test]
    fn test_http_error_converts_into_api_error() {
        let err: ApiError = HttpError::Timeout("30s".to_string()).into();
        assert!(matches!(err, ApiError::Transport(HttpError::Timeout(_))));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let err = AuthError::SignInFailed(ApiError::from_status(401, "nope"));
        let source = err.source().expect("sign-in error should carry its cause");
        assert_eq!(source.to_string(), "server returned 401: nope");
    }
}
