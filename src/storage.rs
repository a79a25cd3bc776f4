//! Best-effort client storage.
//!
//! Everything the site remembers about a visitor (the chosen language, the
//! analytics throttle timestamp) goes through [`PreferenceStore`]. The store
//! checks whether a backend is available and swallows backend failures, so
//! callers never branch on platform availability and never see an error.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Key holding the last chosen locale code.
pub const LANGUAGE_KEY: &str = "asyncz-language";

/// Key holding the timestamp (ms since epoch) of the last analytics request.
pub const ANALYTICS_TIMESTAMP_KEY: &str = "lastAnalyticsRequest";

/// One year, in seconds.
const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("invalid value for key '{key}'")]
    InvalidValue { key: String },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// A raw key/value backend that may fail.
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Capability-checked, exception-safe accessor over an optional backend.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Option<Arc<dyn StorageBackend>>,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A store with no backend: reads return nothing, writes are dropped.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    /// An in-memory store, used by the preview binary and tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::default()))
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                debug!("Storage read of '{}' skipped: {}", key, e);
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(e) = backend.set_item(key, value) {
            debug!("Storage write of '{}' skipped: {}", key, e);
        }
    }

    pub fn remove(&self, key: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(e) = backend.remove_item(key) {
            debug!("Storage removal of '{}' skipped: {}", key, e);
        }
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("available", &self.is_available())
            .finish()
    }
}

/// Process-local backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, String>>,
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Backend over a single HTTP request's cookies.
///
/// Reads come from the request `Cookie` header (overlaid with any writes made
/// while handling the request); writes are collected and turned into
/// `Set-Cookie` headers for the response.
#[derive(Debug, Default)]
pub struct CookieBackend {
    incoming: HashMap<String, String>,
    pending: Mutex<Vec<(String, Option<String>)>>,
}

impl CookieBackend {
    /// Parse a `Cookie` request header (`a=1; b=2`).
    pub fn from_header(header: Option<&str>) -> Self {
        let mut incoming = HashMap::new();
        for pair in header.unwrap_or("").split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                incoming.insert(name.trim().to_string(), value.trim().to_string());
            }
        }
        Self {
            incoming,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// `Set-Cookie` header values for every write made so far, last write wins.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        let Ok(pending) = self.pending.lock() else {
            return Vec::new();
        };

        let mut latest: Vec<(&str, &Option<String>)> = Vec::new();
        for (name, value) in pending.iter() {
            latest.retain(|(existing, _)| *existing != name.as_str());
            latest.push((name.as_str(), value));
        }

        latest
            .into_iter()
            .map(|(name, value)| match value {
                Some(value) => format!(
                    "{}={}; Path=/; Max-Age={}; SameSite=Lax",
                    name, value, COOKIE_MAX_AGE
                ),
                None => format!("{}=; Path=/; Max-Age=0; SameSite=Lax", name),
            })
            .collect()
    }
}

impl StorageBackend for CookieBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let pending = self.pending.lock().map_err(|_| StorageError::Poisoned)?;
        if let Some((_, value)) = pending.iter().rev().find(|(name, _)| name == key) {
            return Ok(value.clone());
        }
        Ok(self.incoming.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !is_cookie_safe(value) {
            return Err(StorageError::InvalidValue {
                key: key.to_string(),
            });
        }
        let mut pending = self.pending.lock().map_err(|_| StorageError::Poisoned)?;
        pending.push((key.to_string(), Some(value.to_string())));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut pending = self.pending.lock().map_err(|_| StorageError::Poisoned)?;
        pending.push((key.to_string(), None));
        Ok(())
    }
}

/// Cookie values we write are locale codes and integers; anything else is rejected.
fn is_cookie_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}
