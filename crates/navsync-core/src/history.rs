#![forbid(unsafe_code)]

//! Address-bar synchronization.
//!
//! Clicks create history entries ([`HistoryMode::Push`]) so back/forward walks
//! through them; passive scrolling edits the current entry
//! ([`HistoryMode::Replace`]) so it never floods history. Neither mode
//! navigates or reloads the page.

use crate::section::SectionId;

/// How a fragment change is written to the session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// New navigable entry (`history.pushState`).
    Push,
    /// Edit the current entry in place (`history.replaceState`).
    Replace,
}

/// Extract the id from a same-page fragment href (`"#about"` → `"about"`).
///
/// Returns `None` for anything else, including a bare `"#"`.
#[must_use]
pub fn fragment_of(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|rest| !rest.is_empty())
}

/// Render the fragment for a section id.
#[must_use]
pub fn to_fragment(id: &SectionId) -> String {
    format!("#{id}")
}

/// Tracks the fragment currently shown in the address bar.
#[derive(Debug, Clone, Default)]
pub struct AddressBar {
    current: Option<SectionId>,
}

impl AddressBar {
    /// Seed with the fragment present at load time.
    #[must_use]
    pub fn with_fragment(fragment: Option<&str>) -> Self {
        Self {
            current: fragment.map(SectionId::new),
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&SectionId> {
        self.current.as_ref()
    }

    /// Decide whether a write is needed.
    ///
    /// Push always writes (each click is its own entry). Replace is skipped
    /// when the fragment would not change.
    pub fn sync(&mut self, id: &SectionId, mode: HistoryMode) -> bool {
        let unchanged = self.current.as_ref() == Some(id);
        if mode == HistoryMode::Replace && unchanged {
            return false;
        }
        self.current = Some(id.clone());
        true
    }

    /// Record a fragment change made by the browser (back/forward).
    pub fn observe(&mut self, fragment: Option<&str>) {
        self.current = fragment.map(SectionId::new);
    }
}
