#![forbid(unsafe_code)]

//! Single-active link setter.
//!
//! # Invariants
//!
//! 1. Once any call to [`LinkRegistry::set_active`] has succeeded, exactly one
//!    link is active.
//! 2. `aria_current` mirrors `active` on every link.
//! 3. Repeating a call with the same id yields no patches.
//!
//! Unknown ids are rejected before any link is touched, so a bad id can never
//! leave the bar with zero active links.

use crate::error::NavError;
use crate::registry::LinkRegistry;
use crate::section::SectionId;

/// A visible state change the host must apply to one link element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPatch {
    pub id: SectionId,
    /// Index of the anchor element in the host's anchor list.
    pub dom_index: usize,
    /// New value for both the active class and `aria-current`.
    pub active: bool,
}

impl LinkRegistry {
    /// Mark `id` as the only active link.
    ///
    /// Returns the links whose state actually changed; an empty vector means
    /// the call was a no-op.
    pub fn set_active(&mut self, id: &str) -> Result<Vec<LinkPatch>, NavError> {
        let target = self
            .position(id)
            .ok_or_else(|| NavError::UnknownSection(SectionId::new(id)))?;

        let mut patches = Vec::new();
        for (i, link) in self.links.iter_mut().enumerate() {
            let want = i == target;
            if link.active != want || link.aria_current != want {
                link.active = want;
                link.aria_current = want;
                patches.push(LinkPatch {
                    id: link.id().clone(),
                    dom_index: link.dom_index(),
                    active: want,
                });
            }
        }
        if !patches.is_empty() {
            crate::logging::trace!(%id, changed = patches.len(), "active link updated");
        }
        Ok(patches)
    }

    /// Id of the currently active link, if initialization has happened.
    #[must_use]
    pub fn active_id(&self) -> Option<&SectionId> {
        self.links.iter().find(|l| l.is_active()).map(|l| l.id())
    }

    /// Every link in its current state, for a full host repaint.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LinkPatch> {
        self.links
            .iter()
            .map(|l| LinkPatch {
                id: l.id().clone(),
                dom_index: l.dom_index(),
                active: l.is_active(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AnchorSpec;

    fn registry() -> LinkRegistry {
        LinkRegistry::build(["#home", "#about", "#contact"].map(AnchorSpec::new))
    }

    fn active_count(reg: &LinkRegistry) -> usize {
        reg.links().iter().filter(|l| l.is_active()).count()
    }

    #[test]
    fn first_activation_patches_only_target() {
        let mut reg = registry();
        let patches = reg.set_active("about").unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].id, "about");
        assert!(patches[0].active);
        assert_eq!(active_count(&reg), 1);
    }

    #[test]
    fn switching_patches_old_and_new() {
        let mut reg = registry();
        reg.set_active("home").unwrap();
        let patches = reg.set_active("contact").unwrap();
        assert_eq!(patches.len(), 2);
        assert!(patches.iter().any(|p| p.id == "home" && !p.active));
        assert!(patches.iter().any(|p| p.id == "contact" && p.active));
        assert_eq!(reg.active_id().map(SectionId::as_str), Some("contact"));
    }

    #[test]
    fn repeat_is_noop() {
        let mut reg = registry();
        reg.set_active("about").unwrap();
        assert!(reg.set_active("about").unwrap().is_empty());
        assert_eq!(active_count(&reg), 1);
    }

    #[test]
    fn unknown_id_rejected_without_side_effects() {
        let mut reg = registry();
        reg.set_active("home").unwrap();
        let err = reg.set_active("blog").unwrap_err();
        assert_eq!(err, NavError::UnknownSection(SectionId::new("blog")));
        assert_eq!(reg.active_id().map(SectionId::as_str), Some("home"));
    }

    #[test]
    fn aria_mirrors_active() {
        let mut reg = registry();
        reg.set_active("contact").unwrap();
        for link in reg.links() {
            assert_eq!(link.is_active(), link.is_aria_current());
        }
    }

    #[test]
    fn snapshot_covers_every_link() {
        let mut reg = registry();
        reg.set_active("about").unwrap();
        let snap = reg.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.iter().filter(|p| p.active).count(), 1);
    }
}
