//! Cookie store trait abstraction.
//!
//! The cookie store is the only state shared between the session layer and
//! the backend: the API client writes it from `Set-Cookie` response headers
//! and the token extractors read it. Nothing else writes auth cookies.

use async_trait::async_trait;

/// Cookie store operation errors.
#[derive(Debug, Clone)]
pub enum CookieError {
    /// Failed to load the cookie jar
    LoadFailed(String),
    /// Failed to persist the cookie jar
    SaveFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for CookieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CookieError::LoadFailed(msg) => write!(f, "Failed to load cookies: {}", msg),
            CookieError::SaveFailed(msg) => write!(f, "Failed to save cookies: {}", msg),
            CookieError::Io(msg) => write!(f, "IO error: {}", msg),
            CookieError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CookieError::Other(msg) => write!(f, "Cookie store error: {}", msg),
        }
    }
}

impl std::error::Error for CookieError {}

/// Trait for cookie jar storage.
///
/// Values are stored exactly as the server sent them (still percent-encoded
/// if the server encoded them); decoding is the reader's concern.
///
/// # Example
///
/// ```ignore
/// use pointwatch::traits::CookieStore;
///
/// async fn logged_in<S: CookieStore>(store: &S) -> Result<bool, CookieError> {
///     Ok(store.get("authTokenproduction").await?.is_some())
/// }
/// ```
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Look up a cookie value by name.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the cookie exists
    /// - `Ok(None)` if it does not
    /// - `Err(error)` if the store could not be read
    async fn get(&self, name: &str) -> Result<Option<String>, CookieError>;

    /// Insert or replace a cookie.
    async fn set(&self, name: &str, value: &str) -> Result<(), CookieError>;

    /// Remove a cookie. Removing a missing cookie is not an error.
    async fn remove(&self, name: &str) -> Result<(), CookieError>;

    /// All stored cookies as `(name, value)` pairs, sorted by name.
    async fn all(&self) -> Result<Vec<(String, String)>, CookieError>;
}
