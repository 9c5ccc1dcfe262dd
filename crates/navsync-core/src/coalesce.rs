#![forbid(unsafe_code)]

//! Scroll signal coalescing.
//!
//! Browsers can deliver dozens of `scroll` events per frame. The coalescer
//! uses a "latest wins" strategy: signals are pushed as they arrive and the
//! host drains once per animation frame, so the resolver runs at most once per
//! frame with the most recent offset.
//!
//! # Usage
//!
//! ```
//! use navsync_core::coalesce::ScrollCoalescer;
//!
//! let mut coalescer = ScrollCoalescer::new();
//!
//! // First signal asks the host to schedule a frame.
//! assert!(coalescer.push(10.0));
//! // Later signals in the same frame just overwrite the offset.
//! assert!(!coalescer.push(25.0));
//!
//! assert_eq!(coalescer.flush(), Some(25.0));
//! assert_eq!(coalescer.flush(), None);
//! ```

/// Latest-wins scroll offset buffer.
///
/// Not thread-safe; lives on the event-loop thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollCoalescer {
    pending: Option<f64>,
}

impl ScrollCoalescer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll signal.
    ///
    /// Returns `true` when this is the first signal since the last flush,
    /// meaning the host should schedule a frame callback.
    pub fn push(&mut self, offset: f64) -> bool {
        let first = self.pending.is_none();
        self.pending = Some(offset);
        first
    }

    /// Take the latest offset, leaving the coalescer empty.
    pub fn flush(&mut self) -> Option<f64> {
        self.pending.take()
    }

    /// Discard any pending signal.
    ///
    /// Hosts call this when the frame they scheduled for a `push` could not be
    /// requested, so the next signal schedules again.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
