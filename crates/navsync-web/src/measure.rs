#![forbid(unsafe_code)]

//! Conversions from raw DOM readings into core types.
//!
//! Kept free of `web-sys` so the arithmetic is testable on native targets.

use navsync_core::{AnchorSpec, Section};

/// Build a [`Section`] from a `getBoundingClientRect()` reading.
///
/// `rect_top` is viewport-relative; adding `scroll_y` converts it to page
/// coordinates. Readings taken mid-scroll are consistent because both values
/// come from the same frame.
#[must_use]
pub fn section_from_rect(id: &str, rect_top: f64, rect_height: f64, scroll_y: f64) -> Section {
    Section::new(id, rect_top + scroll_y, rect_height)
}

/// Classify a navbar anchor.
///
/// Anchors without an `href` still occupy a DOM index but can never match a
/// section.
#[must_use]
pub fn anchor_spec(href: Option<String>, is_brand: bool) -> AnchorSpec {
    AnchorSpec {
        href: href.unwrap_or_default(),
        is_brand,
    }
}

/// Read the section id out of `location.hash`.
#[must_use]
pub fn hash_fragment(hash: &str) -> Option<&str> {
    navsync_core::history::fragment_of(hash)
}
