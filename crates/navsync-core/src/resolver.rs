#![forbid(unsafe_code)]

//! Scroll offset → current section.
//!
//! # Decision Rule
//!
//! With `effective = scroll_offset + header_offset`:
//!
//! 1) `effective < sections[0].top` → first section.
//! 2) `effective ≥ sections[last].top` → last section.
//! 3) Otherwise the section whose `[top, top + height)` contains `effective`.
//!
//! # Preconditions
//!
//! Sections are in document order, non-overlapping and contiguous. If the
//! page has gaps between sections, an offset inside a gap resolves to the
//! nearest section above it.
//!
//! Resolution is pure; callers own every state change.

use crate::section::{Section, SectionId};

/// Fixed header overlay height in CSS pixels.
pub const DEFAULT_HEADER_OFFSET: f64 = 72.0;

/// Position-based resolver compensating for a fixed header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollResolver {
    header_offset: f64,
}

impl Default for ScrollResolver {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_OFFSET)
    }
}

impl ScrollResolver {
    #[must_use]
    pub const fn new(header_offset: f64) -> Self {
        Self { header_offset }
    }

    #[inline]
    #[must_use]
    pub const fn header_offset(&self) -> f64 {
        self.header_offset
    }

    /// Resolve the current section. `None` only when `sections` is empty.
    #[must_use]
    pub fn resolve<'a>(&self, scroll_offset: f64, sections: &'a [Section]) -> Option<&'a SectionId> {
        let first = sections.first()?;
        let last = sections.last()?;
        let effective = scroll_offset + self.header_offset;

        if effective < first.top {
            return Some(&first.id);
        }
        if effective >= last.top {
            return Some(&last.id);
        }
        if let Some(hit) = sections.iter().find(|s| s.contains(effective)) {
            return Some(&hit.id);
        }
        // Gap between sections: nearest one starting above.
        sections
            .iter()
            .rev()
            .find(|s| s.top <= effective)
            .map(|s| &s.id)
            .or(Some(&first.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two() -> Vec<Section> {
        vec![Section::new("a", 0.0, 500.0), Section::new("b", 500.0, 500.0)]
    }

    fn resolve(offset: f64, sections: &[Section]) -> Option<&str> {
        ScrollResolver::default()
            .resolve(offset, sections)
            .map(SectionId::as_str)
    }

    #[test]
    fn header_compensation_crosses_boundary() {
        // 480 + 72 = 552
        assert_eq!(resolve(480.0, &two()), Some("b"));
        // 0 + 72 = 72
        assert_eq!(resolve(0.0, &two()), Some("a"));
    }

    #[test]
    fn exact_boundary_belongs_to_lower_section() {
        assert_eq!(resolve(428.0, &two()), Some("b"));
        assert_eq!(resolve(427.9, &two()), Some("a"));
    }

    #[test]
    fn before_first_top_resolves_first() {
        let sections = vec![Section::new("hero", 300.0, 200.0), Section::new("end", 500.0, 10.0)];
        assert_eq!(resolve(0.0, &sections), Some("hero"));
    }

    #[test]
    fn past_last_top_resolves_last_even_beyond_bottom() {
        assert_eq!(resolve(10_000.0, &two()), Some("b"));
    }

    #[test]
    fn gap_resolves_to_section_above() {
        let sections = vec![
            Section::new("a", 0.0, 100.0),
            Section::new("b", 200.0, 100.0),
            Section::new("c", 400.0, 100.0),
        ];
        let r = ScrollResolver::new(0.0);
        assert_eq!(r.resolve(150.0, &sections).map(SectionId::as_str), Some("a"));
        assert_eq!(r.resolve(350.0, &sections).map(SectionId::as_str), Some("b"));
    }

    #[test]
    fn empty_sections() {
        assert_eq!(resolve(0.0, &[]), None);
    }
}
