//! In-memory cookie store for testing.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::traits::{CookieError, CookieStore};

/// In-memory cookie store for testing.
///
/// Clones share the same jar, so a test can keep one handle while the
/// code under test owns another. Reads are counted per cookie name.
///
/// # Example
///
/// ```ignore
/// use pointwatch::adapters::mock::InMemoryCookies;
/// use pointwatch::traits::CookieStore;
///
/// let cookies = InMemoryCookies::new();
/// cookies.insert("authToken", "abc");
/// assert_eq!(cookies.get("authToken").await?, Some("abc".to_string()));
/// assert_eq!(cookies.read_count("authToken"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCookies {
    jar: Arc<Mutex<BTreeMap<String, String>>>,
    reads: Arc<Mutex<HashMap<String, usize>>>,
    read_should_fail: Arc<Mutex<bool>>,
    write_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryCookies {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with cookies.
    pub fn with_cookies<I, K, V>(cookies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut jar = store.jar.lock().unwrap();
            for (name, value) in cookies {
                jar.insert(name.into(), value.into());
            }
        }
        store
    }

    /// Insert a cookie synchronously (for test setup).
    pub fn insert(&self, name: &str, value: &str) {
        self.jar
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    /// Remove a cookie synchronously.
    pub fn remove_now(&self, name: &str) {
        self.jar.lock().unwrap().remove(name);
    }

    /// Read a cookie synchronously without counting the read.
    pub fn peek(&self, name: &str) -> Option<String> {
        self.jar.lock().unwrap().get(name).cloned()
    }

    /// Number of `get` calls made for a cookie name.
    pub fn read_count(&self, name: &str) -> usize {
        self.reads.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    /// Configure whether reads should fail.
    pub fn set_read_should_fail(&self, should_fail: bool) {
        *self.read_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether writes should fail.
    pub fn set_write_should_fail(&self, should_fail: bool) {
        *self.write_should_fail.lock().unwrap() = should_fail;
    }

    fn check_write(&self) -> Result<(), CookieError> {
        if *self.write_should_fail.lock().unwrap() {
            return Err(CookieError::SaveFailed("mock write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CookieStore for InMemoryCookies {
    async fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        *self.reads.lock().unwrap().entry(name.to_string()).or_insert(0) += 1;
        if *self.read_should_fail.lock().unwrap() {
            return Err(CookieError::LoadFailed("mock read failure".to_string()));
        }
        Ok(self.peek(name))
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), CookieError> {
        self.check_write()?;
        self.insert(name, value);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), CookieError> {
        self.check_write()?;
        self.jar.lock().unwrap().remove(name);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<(String, String)>, CookieError> {
        if *self.read_should_fail.lock().unwrap() {
            return Err(CookieError::LoadFailed("mock read failure".to_string()));
        }
        Ok(self
            .jar
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
