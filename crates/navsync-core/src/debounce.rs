#![forbid(unsafe_code)]

//! Token-based settle debounce.
//!
//! The host owns the actual timer. Every [`arm`](SettleDebounce::arm) hands
//! out a fresh [`SettleToken`]; only the most recent token is honored when
//! its timer fires. A host that cannot cancel timers (or forgets to) is
//! therefore still correct: stale fires are ignored.
//!
//! # Invariants
//!
//! - Tokens are strictly increasing.
//! - At most one token is live at a time.
//! - A token fires at most once.

use std::time::Duration;

/// Default quiet window after the last scroll signal.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(120);

/// Handle for one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SettleToken(u64);

impl SettleToken {
    /// Raw value, for logging.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Resettable delay-and-fire timer bookkeeping.
#[derive(Debug, Clone)]
pub struct SettleDebounce {
    delay: Duration,
    next: u64,
    live: Option<SettleToken>,
}

impl Default for SettleDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

impl SettleDebounce {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            next: 1,
            live: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer. Any previously issued token becomes stale.
    pub fn arm(&mut self) -> SettleToken {
        let token = SettleToken(self.next);
        self.next = self.next.wrapping_add(1);
        self.live = Some(token);
        token
    }

    /// Consume a timer fire. Returns `true` only for the live token.
    pub fn fire(&mut self, token: SettleToken) -> bool {
        if self.live == Some(token) {
            self.live = None;
            true
        } else {
            false
        }
    }
}
