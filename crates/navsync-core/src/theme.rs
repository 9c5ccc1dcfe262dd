#![forbid(unsafe_code)]

//! Light/dark display mode, persisted under a single storage key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;

/// Binary display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a persisted value. Anything unrecognized is `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the theme lives in storage and in the DOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    pub storage_key: String,
    /// Attribute on `<html>` carrying the mode.
    pub root_attribute: String,
    pub icon_selector: String,
    /// Glyph shown while dark mode is on (offers the way back to light).
    pub dark_icon: String,
    pub light_icon: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".into(),
            root_attribute: "data-theme".into(),
            icon_selector: ".theme-icon".into(),
            dark_icon: "☀️".into(),
            light_icon: "🌙".into(),
        }
    }
}

impl ThemeConfig {
    #[must_use]
    pub fn icon_for(&self, theme: Theme) -> &str {
        match theme {
            Theme::Dark => &self.dark_icon,
            Theme::Light => &self.light_icon,
        }
    }
}

/// Theme state bound to a store.
#[derive(Debug)]
pub struct ThemeToggle<S> {
    store: S,
    config: ThemeConfig,
    current: Theme,
}

impl<S: KeyValueStore> ThemeToggle<S> {
    /// Read the persisted mode. Missing, invalid, or unreadable values fall
    /// back to [`Theme::Light`]. An unavailable store is not read at all.
    pub fn load(store: S, config: ThemeConfig) -> Self {
        if !store.is_available() {
            crate::logging::debug!(backend = store.name(), "theme storage unavailable; using default");
            return Self {
                store,
                config,
                current: Theme::default(),
            };
        }
        let current = match store.get(&config.storage_key) {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
                crate::logging::warn!(value = %raw, "ignoring unknown persisted theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                crate::logging::warn!(backend = store.name(), %err, "theme storage unreadable");
                Theme::default()
            }
        };
        Self {
            store,
            config,
            current,
        }
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        self.config.icon_for(self.current)
    }

    #[must_use]
    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flip the mode and persist it.
    ///
    /// A failed write is logged; the in-page mode still flips. Nothing is
    /// written to an unavailable store.
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        if self.store.is_available()
            && let Err(err) = self
                .store
                .set(&self.config.storage_key, self.current.as_str())
        {
            crate::logging::warn!(backend = self.store.name(), %err, "theme not persisted");
        }
        crate::logging::debug!(theme = %self.current, "theme toggled");
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageResult, UnavailableStore};

    /// Holds a value but reports itself offline; counts every access.
    #[derive(Default)]
    struct OfflineStore {
        reads: std::cell::Cell<u32>,
        writes: u32,
    }

    impl KeyValueStore for OfflineStore {
        fn name(&self) -> &str {
            "OfflineStore"
        }

        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            self.reads.set(self.reads.get() + 1);
            Ok(Some("dark".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            self.writes += 1;
            Ok(())
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn default_is_light_with_moon() {
        let toggle = ThemeToggle::load(MemoryStore::new(), ThemeConfig::default());
        assert_eq!(toggle.current(), Theme::Light);
        assert_eq!(toggle.icon(), "🌙");
    }

    #[test]
    fn persisted_dark_is_restored() {
        let store = MemoryStore::with_entries([("theme", "dark")]);
        let toggle = ThemeToggle::load(store, ThemeConfig::default());
        assert_eq!(toggle.current(), Theme::Dark);
        assert_eq!(toggle.icon(), "☀️");
    }

    #[test]
    fn toggle_persists() {
        let mut toggle = ThemeToggle::load(MemoryStore::new(), ThemeConfig::default());
        assert_eq!(toggle.toggle(), Theme::Dark);
        assert_eq!(toggle.store().get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn double_toggle_restores_value_and_glyph() {
        let store = MemoryStore::with_entries([("theme", "dark")]);
        let mut toggle = ThemeToggle::load(store, ThemeConfig::default());
        let icon = toggle.icon().to_owned();
        toggle.toggle();
        toggle.toggle();
        assert_eq!(toggle.current(), Theme::Dark);
        assert_eq!(toggle.icon(), icon);
        assert_eq!(toggle.store().get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn garbage_value_falls_back_to_light() {
        let store = MemoryStore::with_entries([("theme", "sepia")]);
        let toggle = ThemeToggle::load(store, ThemeConfig::default());
        assert_eq!(toggle.current(), Theme::Light);
    }

    #[test]
    fn unavailable_storage_still_toggles() {
        let mut toggle = ThemeToggle::load(UnavailableStore, ThemeConfig::default());
        assert_eq!(toggle.current(), Theme::Light);
        assert_eq!(toggle.toggle(), Theme::Dark);
        assert_eq!(toggle.icon(), "☀️");
    }

    #[test]
    fn offline_store_is_never_touched() {
        let mut toggle = ThemeToggle::load(OfflineStore::default(), ThemeConfig::default());
        assert_eq!(toggle.current(), Theme::Light);
        assert_eq!(toggle.toggle(), Theme::Dark);
        assert_eq!(toggle.store().reads.get(), 0);
        assert_eq!(toggle.store().writes, 0);
    }

    #[test]
    fn custom_storage_key() {
        let config = ThemeConfig {
            storage_key: "site-theme".into(),
            ..ThemeConfig::default()
        };
        let mut toggle = ThemeToggle::load(MemoryStore::new(), config);
        toggle.toggle();
        assert_eq!(toggle.store().get("site-theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(toggle.store().get("theme").unwrap(), None);
    }
}
