#![forbid(unsafe_code)]

//! Error type for navigation operations.
//!
//! Most "failures" in this crate are absent-element conditions from a
//! malformed page. Handlers degrade silently; only builders and explicit
//! setters surface these errors.

use crate::section::SectionId;

/// Errors surfaced by the navigation core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// No registered link points at this section.
    #[error("no navigation link for section `{0}`")]
    UnknownSection(SectionId),

    /// The typewriter was given nothing to type.
    #[error("typewriter phrase list is empty")]
    EmptyPhrases,

    /// A configuration value failed validation.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// Options passed by the host could not be decoded.
    #[error("malformed options: {0}")]
    MalformedOptions(String),

    /// The page rejected a configured CSS selector.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl NavError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code, exposed to JS callers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownSection(_) => "UNKNOWN_SECTION",
            Self::EmptyPhrases => "EMPTY_PHRASES",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::MalformedOptions(_) => "MALFORMED_OPTIONS",
            Self::InvalidSelector { .. } => "INVALID_SELECTOR",
        }
    }
}

impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedOptions(err.to_string())
    }
}
