#![forbid(unsafe_code)]

//! Host-supplied configuration.
//!
//! The web frontend receives a plain JS object, serializes it with
//! `JSON.stringify`, and hands the string to [`NavConfig::from_json`]. Every
//! field is optional; omitted fields take the defaults below.
//!
//! | Field | Default |
//! |-------|---------|
//! | `headerOffset` | `72` |
//! | `scrollPadding` | `0` |
//! | `settleDebounceMs` | `120` |
//! | `sectionSelector` | `section[id]` |
//! | `linkSelector` | `.navbar a[href^="#"]` |
//! | `brandClass` | `logo` |
//! | `activeClass` | `is-active` |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::NavError;
use crate::menu::MenuConfig;
use crate::resolver::DEFAULT_HEADER_OFFSET;
use crate::theme::ThemeConfig;
use crate::typewriter::TypewriterConfig;

/// Upper bound for the settle window. Anything longer makes the navbar feel
/// stuck after a click.
const MAX_SETTLE_DEBOUNCE_MS: u64 = 2_000;

/// Complete configuration for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavConfig {
    /// Fixed header height compensated for when resolving and scrolling.
    pub header_offset: f64,
    /// Extra gap left above a section after a click-scroll.
    pub scroll_padding: f64,
    /// Quiet window after the last scroll signal before passive tracking
    /// resumes.
    pub settle_debounce_ms: u64,
    pub section_selector: String,
    pub link_selector: String,
    /// Links carrying this class are brand/logo links and never tracked.
    pub brand_class: String,
    pub active_class: String,
    pub theme: ThemeConfig,
    pub typewriter: TypewriterConfig,
    pub menu: MenuConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            header_offset: DEFAULT_HEADER_OFFSET,
            scroll_padding: 0.0,
            settle_debounce_ms: 120,
            section_selector: "section[id]".into(),
            link_selector: ".navbar a[href^=\"#\"]".into(),
            brand_class: "logo".into(),
            active_class: "is-active".into(),
            theme: ThemeConfig::default(),
            typewriter: TypewriterConfig::default(),
            menu: MenuConfig::default(),
        }
    }
}

impl NavConfig {
    /// Parse and validate JSON options.
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NavError> {
        if !self.header_offset.is_finite() || self.header_offset < 0.0 {
            return Err(NavError::invalid(
                "headerOffset",
                "must be a finite, non-negative number",
            ));
        }
        if !self.scroll_padding.is_finite() || self.scroll_padding < 0.0 {
            return Err(NavError::invalid(
                "scrollPadding",
                "must be a finite, non-negative number",
            ));
        }
        if !(1..=MAX_SETTLE_DEBOUNCE_MS).contains(&self.settle_debounce_ms) {
            return Err(NavError::invalid(
                "settleDebounceMs",
                format!("must be within 1..={MAX_SETTLE_DEBOUNCE_MS}"),
            ));
        }
        for (field, value) in [
            ("sectionSelector", &self.section_selector),
            ("linkSelector", &self.link_selector),
            ("activeClass", &self.active_class),
            ("brandClass", &self.brand_class),
            ("theme.storageKey", &self.theme.storage_key),
            ("theme.rootAttribute", &self.theme.root_attribute),
            ("theme.iconSelector", &self.theme.icon_selector),
            ("typewriter.selector", &self.typewriter.selector),
            ("menu.toggleSelector", &self.menu.toggle_selector),
            ("menu.containerSelector", &self.menu.container_selector),
            ("menu.openClass", &self.menu.open_class),
        ] {
            if value.trim().is_empty() {
                return Err(NavError::invalid(field, "must not be empty"));
            }
        }
        self.typewriter.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = NavConfig::from_json("{}").unwrap();
        assert_eq!(config, NavConfig::default());
        assert_eq!(config.settle_delay(), Duration::from_millis(120));
    }

    #[test]
    fn camel_case_fields() {
        let config =
            NavConfig::from_json(r#"{"headerOffset": 64, "settleDebounceMs": 150}"#).unwrap();
        assert_eq!(config.header_offset, 64.0);
        assert_eq!(config.settle_debounce_ms, 150);
        assert_eq!(config.active_class, "is-active");
    }

    #[test]
    fn nested_sections_merge_with_defaults() {
        let config = NavConfig::from_json(r#"{"theme": {"storageKey": "site-theme"}}"#).unwrap();
        assert_eq!(config.theme.storage_key, "site-theme");
        assert_eq!(config.theme.icon_selector, ".theme-icon");
    }

    #[test]
    fn rejects_negative_header() {
        let err = NavConfig::from_json(r#"{"headerOffset": -1}"#).unwrap_err();
        assert!(matches!(err, NavError::InvalidConfig { field: "headerOffset", .. }));
    }

    #[test]
    fn rejects_out_of_range_debounce() {
        for ms in [0, 5_000] {
            let json = format!(r#"{{"settleDebounceMs": {ms}}}"#);
            assert!(NavConfig::from_json(&json).is_err(), "{ms} accepted");
        }
    }

    #[test]
    fn rejects_empty_selector() {
        let err = NavConfig::from_json(r#"{"linkSelector": "  "}"#).unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn rejects_empty_nested_hooks() {
        for (json, field) in [
            (r#"{"brandClass": ""}"#, "brandClass"),
            (r#"{"menu": {"toggleSelector": " "}}"#, "menu.toggleSelector"),
            (r#"{"menu": {"openClass": ""}}"#, "menu.openClass"),
            (r#"{"theme": {"iconSelector": ""}}"#, "theme.iconSelector"),
            (r#"{"theme": {"storageKey": ""}}"#, "theme.storageKey"),
            (r#"{"typewriter": {"selector": ""}}"#, "typewriter.selector"),
        ] {
            match NavConfig::from_json(json) {
                Err(NavError::InvalidConfig { field: got, .. }) => assert_eq!(got, field, "{json}"),
                other => panic!("{json} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = NavConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, NavError::MalformedOptions(_)));
    }
}
