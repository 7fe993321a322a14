//! Backend authentication actions.
//!
//! The backend owns the auth cookies: sign-in and refresh answer with
//! `Set-Cookie`, sign-out clears them. [`HttpAuthApi`] performs the calls
//! through the cookie-aware [`ApiClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::token::{decode_envelope, AccessToken};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::traits::Response;

/// Sign-in endpoint, relative to the API base URL.
pub const SIGN_IN_PATH: &str = "auth/sign-in";
/// Sign-out endpoint, relative to the API base URL.
pub const SIGN_OUT_PATH: &str = "auth/sign-out";
/// Token refresh endpoint, relative to the API base URL.
pub const REFRESH_TOKEN_PATH: &str = "auth/refresh-token";

/// Login form contents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

impl SignInCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication calls the session manager depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for session cookies.
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<(), ApiError>;

    /// End the session on the server.
    async fn sign_out(&self) -> Result<(), ApiError>;

    /// Obtain a fresh access token using the refresh cookie.
    ///
    /// Returns the new token when the response body carries it; `Ok(None)`
    /// means the server only rotated the cookies and the caller must read
    /// them back.
    async fn refresh_token(&self) -> Result<Option<AccessToken>, ApiError>;
}

/// [`AuthApi`] over HTTP.
pub struct HttpAuthApi {
    api: Arc<ApiClient>,
}

impl HttpAuthApi {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.post_json(SIGN_IN_PATH, credentials).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.api.post_empty(SIGN_OUT_PATH).await?;
        Ok(())
    }

    async fn refresh_token(&self) -> Result<Option<AccessToken>, ApiError> {
        let response = self.api.post_empty(REFRESH_TOKEN_PATH).await?;
        Ok(token_from_refresh_body(&response))
    }
}

/// Pull an access token out of a refresh response body.
///
/// Understands `{ "message": <token> }` and a bare string holding the
/// cookie encoding. Anything else yields `None`.
fn token_from_refresh_body(response: &Response) -> Option<AccessToken> {
    match response.json::<serde_json::Value>().ok()? {
        serde_json::Value::String(encoded) => decode_envelope(&encoded).ok(),
        serde_json::Value::Object(mut body) => {
            let message = body.remove("message")?;
            serde_json::from_value(message).ok()
        }
        _ => None,
    }
}
