#![forbid(unsafe_code)]

//! Key-value persistence for the handful of flags the page remembers.
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; operations
//!    return [`StorageResult`] and callers fall back to defaults.
//! 2. **String values only**: mirrors browser `localStorage`.
//!
//! # Backends
//!
//! - [`MemoryStore`]: in-memory (tests, storage-less environments).
//! - [`UnavailableStore`]: every operation fails, modelling disabled storage
//!   (private browsing, sandboxed iframes).
//! - `LocalStore` in `navsync-web`: `window.localStorage`.

use std::collections::HashMap;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Backend is not available at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Backend refused the operation (quota, security policy, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Pluggable string key-value store.
pub trait KeyValueStore {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

/// In-memory storage backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.data.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Backend standing in for storage that cannot be used.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn name(&self) -> &str {
        "UnavailableStore"
    }

    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("no storage backend".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("no storage backend".into()))
    }

    fn is_available(&self) -> bool {
        false
    }
}
