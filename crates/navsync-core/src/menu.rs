#![forbid(unsafe_code)]

//! Hamburger menu open/close state.

use serde::{Deserialize, Serialize};

/// DOM hooks for the collapsible menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuConfig {
    pub toggle_selector: String,
    pub container_selector: String,
    pub open_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".menu-toggle".into(),
            container_selector: ".nav-menu".into(),
            open_class: "is-open".into(),
        }
    }
}

/// Open/closed flag for the menu container.
///
/// The trigger's `aria-expanded` always mirrors [`MenuState::is_open`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    #[inline]
    #[must_use]
    pub fn is_open(self) -> bool {
        self.open
    }

    /// Value for the trigger's `aria-expanded` attribute.
    #[must_use]
    pub fn aria_expanded(self) -> &'static str {
        if self.open { "true" } else { "false" }
    }

    /// Trigger clicked.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// A link inside the menu was activated. Returns `true` if this closed
    /// an open menu (the host must then update the DOM).
    pub fn on_link_activated(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}
