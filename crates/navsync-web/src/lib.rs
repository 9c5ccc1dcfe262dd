#![forbid(unsafe_code)]

//! WASM frontend for navsync.
//!
//! Binds the host-independent state machines from `navsync-core` to a real
//! page: reads sections and navbar anchors from the DOM, registers one named
//! handler per DOM event, and executes the returned commands against
//! `web-sys` (class lists, `History`, `localStorage`, timers).
//!
//! ```javascript
//! import init, { NavSync } from './pkg/navsync_web.js';
//!
//! await init();
//! const nav = new NavSync();
//! nav.start({ headerOffset: 72 });
//! ```

pub mod handles;
pub mod measure;

#[cfg(all(target_arch = "wasm32", feature = "console-logging"))]
mod logging;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::NavSync;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct NavSync;

#[cfg(not(target_arch = "wasm32"))]
impl NavSync {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
