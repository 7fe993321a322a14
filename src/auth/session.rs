//! Session lifecycle: hydration, silent refresh, sign-in and sign-out.
//!
//! [`SessionManager`] is the single owner of [`SessionState`]. Consumers
//! read snapshots with [`SessionManager::state`] or follow changes through a
//! `watch` receiver from [`SessionManager::subscribe`]; they never write the
//! state directly.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::service::{AuthApi, SignInCredentials};
use super::token::{
    extract_access_token, extract_refresh_token, AccessToken, RefreshToken, UserProfile,
};
use super::validity::is_access_token_valid;
use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::traits::CookieStore;

/// Observable authentication state.
///
/// `Default` is the "nothing known, nothing happening" state reported
/// outside a provider; a fresh manager starts from [`SessionState::initial`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// True until the first session update completes
    pub is_authenticating: bool,
    /// Profile of the signed-in user
    pub user: Option<UserProfile>,
    /// True while a sign-in request is in flight
    pub signing: bool,
}

impl SessionState {
    /// State of a manager that has not hydrated yet.
    pub fn initial() -> Self {
        Self {
            is_authenticating: true,
            ..Self::default()
        }
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Owns the session state and the actions that change it.
///
/// Session updates are serialized: a second [`update_session`] waits for
/// the one in flight, then observes the cookies it left behind. After
/// [`close`] no further state writes happen.
///
/// [`update_session`]: SessionManager::update_session
/// [`close`]: SessionManager::close
pub struct SessionManager {
    auth: Arc<dyn AuthApi>,
    cookies: Arc<dyn CookieStore>,
    environment: String,
    settle_delay: Duration,
    state_tx: watch::Sender<SessionState>,
    update_lock: Mutex<()>,
    closed: AtomicBool,
}

impl SessionManager {
    pub fn new(
        auth: Arc<dyn AuthApi>,
        cookies: Arc<dyn CookieStore>,
        config: &ClientConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::initial());
        Self {
            auth,
            cookies,
            environment: config.environment.clone(),
            settle_delay: config.settle_delay,
            state_tx,
            update_lock: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state_tx.borrow().is_authenticated()
    }

    /// Restore the session from existing cookies.
    pub async fn hydrate(&self) {
        debug!("Hydrating session from cookies");
        self.update_session().await;
    }

    /// Re-read the token cookies and update the signed-in user.
    ///
    /// An invalid access token is refreshed once when a refresh token is
    /// present. Refresh failures and malformed cookies are logged and leave
    /// the user unresolved. A token that is still expired after the refresh
    /// is ignored, so only a valid token ever sets the user.
    /// `is_authenticating` is always cleared at the end.
    pub async fn update_session(&self) {
        let _guard = self.update_lock.lock().await;
        if self.is_closed() {
            debug!("Session manager closed, skipping update");
            return;
        }

        let user = self.resolve_user().await;
        match &user {
            Some(user) => debug!("Session resolved for user {}", user.id),
            None => debug!("No valid session found"),
        }

        self.modify(|state| {
            if let Some(user) = user {
                state.user = Some(user);
            }
            state.is_authenticating = false;
        });
    }

    /// Wait until the first session update has completed.
    ///
    /// Returns [`AuthError::Closed`] if the manager is closed first.
    pub async fn settled(&self) -> Result<SessionState, AuthError> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|state| !state.is_authenticating || self.is_closed())
            .await
            .map_err(|_| AuthError::Closed)?
            .clone();
        if state.is_authenticating {
            return Err(AuthError::Closed);
        }
        Ok(state)
    }

    /// Sign in and populate the session from the cookies the backend sets.
    ///
    /// `signing` is true for the duration of the backend call. On failure
    /// the session is left untouched and the error is returned.
    pub async fn sign_in(&self, credentials: &SignInCredentials) -> Result<(), AuthError> {
        self.ensure_open()?;

        self.modify(|state| state.signing = true);
        let result = self.auth.sign_in(credentials).await;
        self.modify(|state| state.signing = false);

        match result {
            Ok(()) => {
                info!("Signed in as {}", credentials.email);
                self.update_session().await;
                Ok(())
            }
            Err(err) => {
                warn!("Sign-in failed for {}: {}", credentials.email, err);
                Err(AuthError::SignInFailed(err))
            }
        }
    }

    /// Sign out. The local user is cleared whether or not the backend
    /// call succeeds.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.ensure_open()?;
        let _guard = self.update_lock.lock().await;

        match self.auth.sign_out().await {
            Ok(()) => info!("Signed out"),
            Err(err) => warn!("Sign-out request failed, clearing local session anyway: {}", err),
        }

        self.modify(|state| state.user = None);
        Ok(())
    }

    /// Stop accepting actions and state writes.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("Session manager closed");
            // Wake `settled` waiters without changing the state.
            self.state_tx.send_modify(|_| {});
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn resolve_user(&self) -> Option<UserProfile> {
        let access = self.read_access_token().await;
        if is_access_token_valid(access.as_ref()) {
            return access.map(|token| token.user);
        }

        if self.read_refresh_token().await.is_none() {
            debug!("Access token missing or expired and no refresh token present");
            return None;
        }

        debug!("Access token missing or expired, refreshing");
        let refreshed = match self.auth.refresh_token().await {
            Ok(Some(token)) => Some(token),
            Ok(None) => {
                tokio::time::sleep(self.settle_delay).await;
                self.read_access_token().await
            }
            Err(err) => {
                warn!("Token refresh failed: {}", err);
                return None;
            }
        };

        refreshed
            .filter(|token| is_access_token_valid(Some(token)))
            .map(|token| token.user)
    }

    async fn read_access_token(&self) -> Option<AccessToken> {
        match extract_access_token(self.cookies.as_ref(), &self.environment).await {
            Ok(token) => token,
            Err(err) => {
                warn!("[{}] Ignoring access token cookie: {}", err.error_code(), err);
                None
            }
        }
    }

    async fn read_refresh_token(&self) -> Option<RefreshToken> {
        match extract_refresh_token(self.cookies.as_ref(), &self.environment).await {
            Ok(token) => token,
            Err(err) => {
                warn!("[{}] Ignoring refresh token cookie: {}", err.error_code(), err);
                None
            }
        }
    }

    fn ensure_open(&self) -> Result<(), AuthError> {
        if self.is_closed() {
            return Err(AuthError::Closed);
        }
        Ok(())
    }

    fn modify(&self, update: impl FnOnce(&mut SessionState)) {
        if self.is_closed() {
            return;
        }
        self.state_tx.send_modify(update);
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("environment", &self.environment)
            .field("settle_delay", &self.settle_delay)
            .field("state", &*self.state_tx.borrow())
            .field("closed", &self.is_closed())
            .finish()
    }
}
