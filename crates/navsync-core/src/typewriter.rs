#![forbid(unsafe_code)]

//! Typewriter text cycling.
//!
//! Reveals a phrase one grapheme at a time, holds, deletes it one grapheme at
//! a time, pauses, then moves to the next phrase, looping forever. The host
//! calls [`Typewriter::step`], writes the returned text, and schedules the
//! next step after the returned delay.
//!
//! Timing is asymmetric: typing is slower than deleting, and the pause at a
//! full phrase is longer than the pause at empty.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::NavError;

/// Phrases and timing for the typewriter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypewriterConfig {
    /// Element whose text content is animated.
    pub selector: String,
    pub phrases: Vec<String>,
    pub type_delay_ms: u64,
    pub delete_delay_ms: u64,
    /// Pause once a phrase is fully shown.
    pub hold_delay_ms: u64,
    /// Pause once a phrase is fully deleted.
    pub gap_delay_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            selector: ".typewriter".into(),
            phrases: [
                "web development",
                "web design",
                "app development",
                "app design",
                "front end development",
            ]
            .map(String::from)
            .to_vec(),
            type_delay_ms: 120,
            delete_delay_ms: 50,
            hold_delay_ms: 1200,
            gap_delay_ms: 400,
        }
    }
}

impl TypewriterConfig {
    pub fn validate(&self) -> Result<(), NavError> {
        if self.phrases.is_empty() {
            return Err(NavError::EmptyPhrases);
        }
        if self.phrases.iter().any(String::is_empty) {
            return Err(NavError::invalid("typewriter.phrases", "phrases must not be empty"));
        }
        let delays = [
            self.type_delay_ms,
            self.delete_delay_ms,
            self.hold_delay_ms,
            self.gap_delay_ms,
        ];
        if delays.contains(&0) {
            return Err(NavError::invalid("typewriter", "delays must be positive"));
        }
        Ok(())
    }
}

/// One rendered step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterFrame {
    pub text: String,
    /// Wait this long before the next [`Typewriter::step`].
    pub delay: Duration,
}

/// Phrase-cycling state machine.
#[derive(Debug, Clone)]
pub struct Typewriter {
    /// Each phrase pre-split into grapheme clusters.
    phrases: Vec<Vec<String>>,
    config: TypewriterConfig,
    phrase: usize,
    shown: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new(config: TypewriterConfig) -> Result<Self, NavError> {
        config.validate()?;
        let phrases = config
            .phrases
            .iter()
            .map(|p| p.graphemes(true).map(str::to_owned).collect())
            .collect();
        Ok(Self {
            phrases,
            config,
            phrase: 0,
            shown: 0,
            deleting: false,
        })
    }

    /// Index of the phrase currently being typed or deleted.
    #[inline]
    #[must_use]
    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    #[inline]
    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Advance one grapheme and return the text to display.
    pub fn step(&mut self) -> TypewriterFrame {
        let len = self.phrases[self.phrase].len();
        if self.deleting {
            self.shown = self.shown.saturating_sub(1);
        } else {
            self.shown = (self.shown + 1).min(len);
        }
        let text = self.phrases[self.phrase][..self.shown].concat();

        let mut delay = if self.deleting {
            self.config.delete_delay_ms
        } else {
            self.config.type_delay_ms
        };
        if !self.deleting && self.shown == len {
            delay = self.config.hold_delay_ms;
            self.deleting = true;
        } else if self.deleting && self.shown == 0 {
            delay = self.config.gap_delay_ms;
            self.deleting = false;
            self.phrase = (self.phrase + 1) % self.phrases.len();
        }

        TypewriterFrame {
            text,
            delay: Duration::from_millis(delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(phrases: &[&str]) -> TypewriterConfig {
        TypewriterConfig {
            phrases: phrases.iter().map(|p| (*p).to_owned()).collect(),
            ..TypewriterConfig::default()
        }
    }

    fn ms(frame: &TypewriterFrame) -> u128 {
        frame.delay.as_millis()
    }

    #[test]
    fn full_cycle_timing() {
        let mut tw = Typewriter::new(config(&["ab", "x"])).unwrap();

        let f = tw.step();
        assert_eq!((f.text.as_str(), ms(&f)), ("a", 120));
        let f = tw.step();
        assert_eq!((f.text.as_str(), ms(&f)), ("ab", 1200));
        assert!(tw.is_deleting());
        let f = tw.step();
        assert_eq!((f.text.as_str(), ms(&f)), ("a", 50));
        let f = tw.step();
        assert_eq!((f.text.as_str(), ms(&f)), ("", 400));
        assert_eq!(tw.phrase_index(), 1);
        assert!(!tw.is_deleting());

        let f = tw.step();
        assert_eq!((f.text.as_str(), ms(&f)), ("x", 1200));
    }

    #[test]
    fn wraps_back_to_first_phrase() {
        let mut tw = Typewriter::new(config(&["a", "b"])).unwrap();
        for _ in 0..4 {
            tw.step();
        }
        assert_eq!(tw.phrase_index(), 0);
        assert_eq!(tw.step().text, "a");
    }

    #[test]
    fn grapheme_clusters_stay_whole() {
        let mut tw = Typewriter::new(config(&["e\u{301}🇯🇵"])).unwrap();
        assert_eq!(tw.step().text, "e\u{301}");
        assert_eq!(tw.step().text, "e\u{301}🇯🇵");
    }

    #[test]
    fn default_phrases_are_valid() {
        let tw = Typewriter::new(TypewriterConfig::default()).unwrap();
        assert_eq!(tw.phrases.len(), 5);
    }

    #[test]
    fn rejects_empty_list_and_empty_phrase() {
        assert_eq!(Typewriter::new(config(&[])).unwrap_err(), NavError::EmptyPhrases);
        assert!(Typewriter::new(config(&["ok", ""])).is_err());
    }

    #[test]
    fn rejects_zero_delay() {
        let cfg = TypewriterConfig {
            delete_delay_ms: 0,
            ..TypewriterConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
