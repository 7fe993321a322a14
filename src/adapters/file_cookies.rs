//! File-backed cookie store.
//!
//! Persists the cookie jar as JSON so a session survives process restarts,
//! the way a browser keeps cookies across page reloads.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::traits::{CookieError, CookieStore};

/// The cookie jar directory name.
const COOKIE_DIR: &str = ".pointwatch";

/// The cookie jar file name.
const COOKIE_FILE: &str = "cookies.json";

type Jar = BTreeMap<String, String>;

/// Cookie store persisted to a JSON file.
///
/// Defaults to `~/.pointwatch/cookies.json`. Every write rewrites the whole
/// file; an in-process lock keeps read-modify-write cycles from interleaving.
#[derive(Debug)]
pub struct FileCookieStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCookieStore {
    /// Create a store at the default location.
    ///
    /// # Returns
    /// The store, or an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CookieError> {
        let home = dirs::home_dir()
            .ok_or_else(|| CookieError::Other("Failed to determine home directory".to_string()))?;
        Ok(Self::with_path(home.join(COOKIE_DIR).join(COOKIE_FILE)))
    }

    /// Create a store backed by a specific file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Get the path to the cookie file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_jar(&self) -> Result<Jar, CookieError> {
        if !self.path.exists() {
            return Ok(Jar::new());
        }

        let file = File::open(&self.path).map_err(|e| CookieError::LoadFailed(e.to_string()))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| CookieError::Serialization(e.to_string()))
    }

    fn save_jar(&self, jar: &Jar) -> Result<(), CookieError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CookieError::Io(e.to_string()))?;
            }
        }

        let file = File::create(&self.path).map_err(|e| CookieError::SaveFailed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, jar)
            .map_err(|e| CookieError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| CookieError::SaveFailed(e.to_string()))
    }

    fn modify<F>(&self, f: F) -> Result<(), CookieError>
    where
        F: FnOnce(&mut Jar),
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| CookieError::Other("cookie lock poisoned".to_string()))?;
        let mut jar = self.load_jar()?;
        f(&mut jar);
        self.save_jar(&jar)
    }
}

#[async_trait]
impl CookieStore for FileCookieStore {
    async fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        Ok(self.load_jar()?.remove(name))
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), CookieError> {
        self.modify(|jar| {
            jar.insert(name.to_string(), value.to_string());
        })
    }

    async fn remove(&self, name: &str) -> Result<(), CookieError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.modify(|jar| {
            jar.remove(name);
        })
    }

    async fn all(&self) -> Result<Vec<(String, String)>, CookieError> {
        Ok(self.load_jar()?.into_iter().collect())
    }
}
