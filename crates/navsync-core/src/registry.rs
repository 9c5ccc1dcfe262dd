#![forbid(unsafe_code)]

//! Section id → navigation link mapping.
//!
//! Built once at startup from the navbar anchors. The registry owns the
//! per-link `active` / `aria-current` state; mutation goes through
//! [`LinkRegistry::set_active`](crate::active).

use std::collections::HashMap;

use crate::history::fragment_of;
use crate::section::SectionId;

/// A navbar anchor as read from the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSpec {
    /// Raw `href` attribute value (e.g. `"#about"`).
    pub href: String,
    /// Brand/logo links are never part of the registry.
    pub is_brand: bool,
}

impl AnchorSpec {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            is_brand: false,
        }
    }

    #[must_use]
    pub fn brand(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            is_brand: true,
        }
    }
}

/// One navigation link and its visible state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    id: SectionId,
    /// Position of the anchor among the host's anchor list.
    dom_index: usize,
    pub(crate) active: bool,
    pub(crate) aria_current: bool,
}

impl NavLink {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Index into the anchor list the registry was built from, so the host
    /// can map a link back to its element.
    #[inline]
    #[must_use]
    pub fn dom_index(&self) -> usize {
        self.dom_index
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    #[must_use]
    pub fn is_aria_current(&self) -> bool {
        self.aria_current
    }
}

/// Ordered set of navigation links keyed by section id.
#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    pub(crate) links: Vec<NavLink>,
    index: HashMap<SectionId, usize>,
}

impl LinkRegistry {
    /// Build the registry from anchors in document order.
    ///
    /// Brand links and hrefs that are not same-page fragments are skipped.
    /// When two anchors point at the same fragment the first one wins.
    pub fn build<I>(anchors: I) -> Self
    where
        I: IntoIterator<Item = AnchorSpec>,
    {
        let mut registry = Self::default();
        for (dom_index, anchor) in anchors.into_iter().enumerate() {
            if anchor.is_brand {
                continue;
            }
            let Some(fragment) = fragment_of(&anchor.href) else {
                crate::logging::debug!(href = %anchor.href, "skipping non-fragment nav link");
                continue;
            };
            let id = SectionId::new(fragment);
            if registry.index.contains_key(&id) {
                crate::logging::debug!(%id, "duplicate nav link ignored");
                continue;
            }
            registry.index.insert(id.clone(), registry.links.len());
            registry.links.push(NavLink {
                id,
                dom_index,
                active: false,
                aria_current: false,
            });
        }
        registry
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&NavLink> {
        self.index.get(id).map(|&i| &self.links[i])
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Links in document order.
    #[must_use]
    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Id of the first link, used as the fallback initial section.
    #[must_use]
    pub fn first_id(&self) -> Option<&SectionId> {
        self.links.first().map(NavLink::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navbar() -> Vec<AnchorSpec> {
        vec![
            AnchorSpec::brand("#home"),
            AnchorSpec::new("#home"),
            AnchorSpec::new("#about"),
            AnchorSpec::new("https://example.com/blog"),
            AnchorSpec::new("#projects"),
            AnchorSpec::new("#about"),
            AnchorSpec::new("#"),
        ]
    }

    #[test]
    fn brand_and_external_links_excluded() {
        let reg = LinkRegistry::build(navbar());
        let ids: Vec<&str> = reg.links().iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, vec!["home", "about", "projects"]);
    }

    #[test]
    fn dom_index_points_at_source_anchor() {
        let reg = LinkRegistry::build(navbar());
        assert_eq!(reg.get("home").map(NavLink::dom_index), Some(1));
        assert_eq!(reg.get("projects").map(NavLink::dom_index), Some(4));
    }

    #[test]
    fn duplicate_fragment_keeps_first() {
        let reg = LinkRegistry::build(navbar());
        assert_eq!(reg.get("about").map(NavLink::dom_index), Some(2));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn fresh_registry_has_nothing_active() {
        let reg = LinkRegistry::build(navbar());
        assert!(reg.links().iter().all(|l| !l.is_active() && !l.is_aria_current()));
        assert_eq!(reg.first_id().map(SectionId::as_str), Some("home"));
    }

    #[test]
    fn empty_registry() {
        let reg = LinkRegistry::build(Vec::new());
        assert!(reg.is_empty());
        assert!(reg.first_id().is_none());
        assert!(!reg.contains("home"));
    }
}
