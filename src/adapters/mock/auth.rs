//! Scripted authentication backend for testing.
//!
//! [`MockAuthApi`] plays the server's part: successful sign-in and refresh
//! write cookies into a shared [`InMemoryCookies`] jar, the way a real
//! backend's `Set-Cookie` headers would.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::cookies::InMemoryCookies;
use crate::auth::{AccessToken, AuthApi, SignInCredentials};
use crate::error::ApiError;

/// A call received by [`MockAuthApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    SignIn { email: String },
    SignOut,
    Refresh,
}

/// What a refresh call does.
#[derive(Debug, Clone)]
pub enum RefreshBehavior {
    /// Write these cookies and return no token
    SetCookies(Vec<(String, String)>),
    /// Return the token in the response body
    ReturnToken(AccessToken),
    /// Fail with this error
    Fail(ApiError),
}

impl Default for RefreshBehavior {
    fn default() -> Self {
        RefreshBehavior::SetCookies(Vec::new())
    }
}

/// Authentication backend double.
///
/// # Example
///
/// ```ignore
/// use pointwatch::adapters::mock::{InMemoryCookies, MockAuthApi};
///
/// let cookies = InMemoryCookies::new();
/// let auth = MockAuthApi::new(cookies.clone());
/// auth.set_sign_in_cookies([("authToken", "...")]);
/// ```
#[derive(Debug, Clone)]
pub struct MockAuthApi {
    cookies: InMemoryCookies,
    calls: Arc<Mutex<Vec<AuthCall>>>,
    sign_in_cookies: Arc<Mutex<Vec<(String, String)>>>,
    sign_in_error: Arc<Mutex<Option<ApiError>>>,
    sign_out_error: Arc<Mutex<Option<ApiError>>>,
    refresh: Arc<Mutex<RefreshBehavior>>,
    latency: Arc<Mutex<Option<Duration>>>,
}

impl MockAuthApi {
    /// Create a backend writing into `cookies`.
    pub fn new(cookies: InMemoryCookies) -> Self {
        Self {
            cookies,
            calls: Arc::new(Mutex::new(Vec::new())),
            sign_in_cookies: Arc::new(Mutex::new(Vec::new())),
            sign_in_error: Arc::new(Mutex::new(None)),
            sign_out_error: Arc::new(Mutex::new(None)),
            refresh: Arc::new(Mutex::new(RefreshBehavior::default())),
            latency: Arc::new(Mutex::new(None)),
        }
    }

    /// Cookies written by a successful sign-in (and cleared by sign-out).
    pub fn set_sign_in_cookies<I, K, V>(&self, cookies: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        *self.sign_in_cookies.lock().unwrap() = cookies
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
    }

    /// Make sign-in fail with `error`, or succeed again with `None`.
    pub fn set_sign_in_error(&self, error: Option<ApiError>) {
        *self.sign_in_error.lock().unwrap() = error;
    }

    /// Make sign-out fail with `error`, or succeed again with `None`.
    pub fn set_sign_out_error(&self, error: Option<ApiError>) {
        *self.sign_out_error.lock().unwrap() = error;
    }

    pub fn set_refresh_behavior(&self, behavior: RefreshBehavior) {
        *self.refresh.lock().unwrap() = behavior;
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    /// All calls received, in order.
    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sign_in_calls(&self) -> usize {
        self.count(|call| matches!(call, AuthCall::SignIn { .. }))
    }

    pub fn sign_out_calls(&self) -> usize {
        self.count(|call| matches!(call, AuthCall::SignOut))
    }

    pub fn refresh_calls(&self) -> usize {
        self.count(|call| matches!(call, AuthCall::Refresh))
    }

    fn count(&self, predicate: impl Fn(&AuthCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    async fn record(&self, call: AuthCall) {
        self.calls.lock().unwrap().push(call);
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<(), ApiError> {
        self.record(AuthCall::SignIn {
            email: credentials.email.clone(),
        })
        .await;

        let error = self.sign_in_error.lock().unwrap().clone();
        if let Some(error) = error {
            return Err(error);
        }
        let cookies = self.sign_in_cookies.lock().unwrap().clone();
        for (name, value) in &cookies {
            self.cookies.insert(name, value);
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.record(AuthCall::SignOut).await;

        let error = self.sign_out_error.lock().unwrap().clone();
        if let Some(error) = error {
            return Err(error);
        }
        let cookies = self.sign_in_cookies.lock().unwrap().clone();
        for (name, _) in &cookies {
            self.cookies.remove_now(name);
        }
        Ok(())
    }

    async fn refresh_token(&self) -> Result<Option<AccessToken>, ApiError> {
        self.record(AuthCall::Refresh).await;

        let behavior = self.refresh.lock().unwrap().clone();
        match behavior {
            RefreshBehavior::SetCookies(cookies) => {
                for (name, value) in &cookies {
                    self.cookies.insert(name, value);
                }
                Ok(None)
            }
            RefreshBehavior::ReturnToken(token) => Ok(Some(token)),
            RefreshBehavior::Fail(error) => Err(error),
        }
    }
}
