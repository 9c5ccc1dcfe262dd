#![forbid(unsafe_code)]

//! `window.localStorage` backend.
//!
//! Accessing `localStorage` can throw (disabled cookies, sandboxed iframes,
//! Safari private mode quota). Every failure becomes a [`StorageError`] and
//! callers fall back to defaults.

use navsync_core::storage::{KeyValueStore, StorageError, StorageResult};
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

pub(crate) struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub(crate) fn new(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                tracing::warn!(error = %js_message(&err), "localStorage access denied");
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))
    }
}

impl KeyValueStore for LocalStore {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(js_message(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(js_message(&e)))
    }

    fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

/// Best-effort message from a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}
