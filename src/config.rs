//! Client configuration.
//!
//! Use the builder methods to customize, or [`ClientConfig::from_env`] to
//! read the `POINTWATCH_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Default wait between a refresh call and re-reading the access cookie.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "POINTWATCH_API_URL";
/// Environment variable holding the deployment identifier.
pub const ENV_ENVIRONMENT: &str = "POINTWATCH_ENV";
/// Environment variable overriding the settle delay, in milliseconds.
pub const ENV_SETTLE_DELAY_MS: &str = "POINTWATCH_SETTLE_DELAY_MS";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "POINTWATCH_TIMEOUT_SECS";
/// Environment variable overriding the cookie jar location.
pub const ENV_COOKIE_PATH: &str = "POINTWATCH_COOKIE_PATH";

/// Configuration shared by the API client and the session manager.
///
/// # Example
///
/// ```ignore
/// use pointwatch::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_api_base_url("https://api.example.com")
///     .with_environment("staging");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,
    /// Deployment identifier appended to cookie names
    pub environment: String,
    /// Wait before re-reading the access cookie after a refresh that did
    /// not return the new token
    pub settle_delay: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Cookie jar location (default: `~/.pointwatch/cookies.json`)
    pub cookie_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            environment: String::new(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cookie_path: None,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL. Trailing slashes are dropped.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the deployment environment suffix.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Set the post-refresh settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the cookie jar path.
    pub fn with_cookie_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_path = Some(path.into());
        self
    }

    /// Create config from `POINTWATCH_*` environment variables.
    ///
    /// Unset variables keep their defaults. Unparseable numbers are logged
    /// and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config = config.with_api_base_url(url.trim());
            }
        }

        if let Ok(environment) = std::env::var(ENV_ENVIRONMENT) {
            config.environment = environment;
        }

        if let Some(ms) = read_number(ENV_SETTLE_DELAY_MS) {
            config.settle_delay = Duration::from_millis(ms);
        }

        if let Some(secs) = read_number(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(path) = std::env::var(ENV_COOKIE_PATH) {
            if !path.is_empty() {
                config.cookie_path = Some(PathBuf::from(path));
            }
        }

        config
    }
}

fn read_number(var: &str) -> Option<u64> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", var, raw, e);
            None
        }
    }
}
