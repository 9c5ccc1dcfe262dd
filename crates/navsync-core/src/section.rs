#![forbid(unsafe_code)]

//! Page sections and their vertical geometry.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a navigable section (the element's `id` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A content block measured in page coordinates (CSS pixels).
///
/// `top` is the distance from the top of the document, not the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub top: f64,
    pub height: f64,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<SectionId>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height: height.max(0.0),
        }
    }

    /// Exclusive bottom edge (`top + height`).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether `offset` falls in `[top, bottom)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.top && offset < self.bottom()
    }
}

/// Find a section by id in a measured snapshot.
#[must_use]
pub fn find_section<'a>(sections: &'a [Section], id: &str) -> Option<&'a Section> {
    sections.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let s = Section::new("about", 100.0, 50.0);
        assert!(!s.contains(99.9));
        assert!(s.contains(100.0));
        assert!(s.contains(149.9));
        assert!(!s.contains(150.0));
    }

    #[test]
    fn negative_height_clamps_to_zero() {
        let s = Section::new("x", 10.0, -5.0);
        assert_eq!(s.height, 0.0);
        assert!(!s.contains(10.0));
    }

    #[test]
    fn find_section_by_str() {
        let sections = vec![Section::new("a", 0.0, 10.0), Section::new("b", 10.0, 10.0)];
        assert_eq!(find_section(&sections, "b").map(|s| s.top), Some(10.0));
        assert!(find_section(&sections, "c").is_none());
    }

    #[test]
    fn section_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&SectionId::new("home")).unwrap();
        assert_eq!(json, "\"home\"");
    }
}
