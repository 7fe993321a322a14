//! Wiring of the HTTP client, cookie jar, session manager and
//! monitoring actions into one handle.

use std::sync::{Arc, Mutex};

use crate::adapters::{FileCookieStore, ReqwestHttpClient};
use crate::api::ApiClient;
use crate::auth::{AuthApi, AuthProvider, HttpAuthApi, SessionManager};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::monitoring::MonitoringPointsClient;
use crate::traits::{CookieStore, HttpClient};

/// Everything a pointwatch consumer needs, sharing one cookie jar.
pub struct PointwatchClient {
    config: ClientConfig,
    api: Arc<ApiClient>,
    auth: Arc<dyn AuthApi>,
    cookies: Arc<dyn CookieStore>,
    session: Mutex<Arc<SessionManager>>,
    points: MonitoringPointsClient,
}

impl PointwatchClient {
    /// Build the production stack: reqwest over a file-backed cookie jar.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let http = ReqwestHttpClient::with_timeout(config.request_timeout)?;
        let cookies = match &config.cookie_path {
            Some(path) => FileCookieStore::with_path(path.clone()),
            None => FileCookieStore::new()?,
        };
        tracing::debug!("Using cookie jar at {}", cookies.path().display());
        Ok(Self::with_adapters(config, Arc::new(http), Arc::new(cookies)))
    }

    /// Build the stack over caller-provided adapters.
    pub fn with_adapters(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        cookies: Arc<dyn CookieStore>,
    ) -> Self {
        let api = Arc::new(ApiClient::new(http, cookies.clone(), config.api_base_url.clone()));
        let auth: Arc<dyn AuthApi> = Arc::new(HttpAuthApi::new(api.clone()));
        let session = Arc::new(SessionManager::new(auth.clone(), cookies.clone(), &config));
        let points = MonitoringPointsClient::new(api.clone());
        Self {
            config,
            api,
            auth,
            cookies,
            session: Mutex::new(session),
            points,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Session manager of the most recent mount.
    pub fn session(&self) -> Arc<SessionManager> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn points(&self) -> &MonitoringPointsClient {
        &self.points
    }

    /// Mount a fresh session and start hydrating it from the cookie jar.
    ///
    /// Dropping the returned provider closes that mount's session manager.
    /// A later mount starts over from the cookies.
    pub fn mount(&self) -> AuthProvider {
        let manager = Arc::new(SessionManager::new(
            self.auth.clone(),
            self.cookies.clone(),
            &self.config,
        ));
        *self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = manager.clone();
        AuthProvider::mount(manager)
    }
}
