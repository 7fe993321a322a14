//! Session access for consumers.
//!
//! An [`AuthProvider`] mounts a [`SessionManager`]: it starts hydration and
//! closes the manager when dropped. Consumers receive an [`AuthContext`],
//! which is either backed by a mounted manager or explicitly unavailable.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use super::service::SignInCredentials;
use super::session::{SessionManager, SessionState};
use super::token::UserProfile;
use crate::error::AuthError;

/// Session handle passed to consumers.
///
/// [`AuthContext::Unavailable`] is what a consumer holds when no provider is
/// mounted. It reports a signed-out, idle session, and its actions fail with
/// [`AuthError::ProviderUnavailable`].
#[derive(Debug, Clone, Default)]
pub enum AuthContext {
    #[default]
    Unavailable,
    Provided(Arc<SessionManager>),
}

impl AuthContext {
    pub fn is_available(&self) -> bool {
        matches!(self, AuthContext::Provided(_))
    }

    /// Snapshot of the session state.
    pub fn state(&self) -> SessionState {
        match self {
            AuthContext::Provided(manager) => manager.state(),
            AuthContext::Unavailable => SessionState::default(),
        }
    }

    pub fn is_authenticating(&self) -> bool {
        self.state().is_authenticating
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state().user
    }

    pub fn signing(&self) -> bool {
        self.state().signing
    }

    /// Receiver for state changes.
    ///
    /// When unavailable the receiver holds the default state and never
    /// reports a change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        match self {
            AuthContext::Provided(manager) => manager.subscribe(),
            AuthContext::Unavailable => watch::channel(SessionState::default()).1,
        }
    }

    pub async fn sign_in(&self, credentials: &SignInCredentials) -> Result<(), AuthError> {
        self.manager("sign_in")?.sign_in(credentials).await
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.manager("sign_out")?.sign_out().await
    }

    fn manager(&self, action: &str) -> Result<&Arc<SessionManager>, AuthError> {
        match self {
            AuthContext::Provided(manager) => Ok(manager),
            AuthContext::Unavailable => {
                error!("{} called without a mounted session provider", action);
                Err(AuthError::ProviderUnavailable)
            }
        }
    }
}

/// Mounted session provider.
///
/// Must be created inside a Tokio runtime.
///
/// # Example
///
/// ```ignore
/// let mut provider = AuthProvider::mount(Arc::new(manager));
/// let state = provider.ready().await;
/// let context = provider.context();
/// ```
#[derive(Debug)]
pub struct AuthProvider {
    manager: Arc<SessionManager>,
    hydration: Option<JoinHandle<()>>,
}

impl AuthProvider {
    /// Mount `manager` and start hydrating it from cookies.
    pub fn mount(manager: Arc<SessionManager>) -> Self {
        let hydrating = manager.clone();
        let hydration = tokio::spawn(async move { hydrating.hydrate().await });
        Self {
            manager,
            hydration: Some(hydration),
        }
    }

    /// Wait for hydration to finish and return the resulting state.
    pub async fn ready(&mut self) -> SessionState {
        if let Some(hydration) = self.hydration.take() {
            if let Err(e) = hydration.await {
                warn!("Session hydration task failed: {}", e);
            }
        }
        self.manager.state()
    }

    /// Context for consumers below this provider.
    pub fn context(&self) -> AuthContext {
        AuthContext::Provided(self.manager.clone())
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }
}

impl Drop for AuthProvider {
    fn drop(&mut self) {
        self.manager.close();
        if let Some(hydration) = self.hydration.take() {
            hydration.abort();
        }
    }
}
