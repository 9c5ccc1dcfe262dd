#![forbid(unsafe_code)]

//! Ownership of page registrations.
//!
//! A closure handed to `addEventListener` (or stored on `window`) must be
//! unregistered before it is freed, or the page calls into a dropped
//! closure. [`Registrations`] owns every such handle and detaches them all on
//! [`release`](Registrations::release) or when it is dropped.

/// A page registration that must be undone before its callback is freed.
pub trait Detach {
    fn detach(&mut self);
}

/// Registered handles, detached newest first.
#[derive(Default)]
pub struct Registrations {
    active: Vec<Box<dyn Detach>>,
}

impl Registrations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handle: impl Detach + 'static) {
        self.active.push(Box::new(handle));
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Detach and free every handle.
    pub fn release(&mut self) {
        while let Some(mut handle) = self.active.pop() {
            handle.detach();
        }
    }
}

impl Drop for Registrations {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Registrations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrations")
            .field("active", &self.active.len())
            .finish()
    }
}
