#![forbid(unsafe_code)]

//! Core: section geometry, link registry, scroll resolution, and the
//! navigation state machine.
//!
//! Everything in this crate is host-driven and deterministic. Nothing here
//! touches the DOM or owns a timer; handlers return [`NavCmd`] values and the
//! embedding environment (see `navsync-web`) executes them.
//!
//! # Data flow
//!
//! ```text
//! click  ─► NavigationController::on_link_click ─► SetLinks ─► SyncUrl(Push)
//!                                                ─► ScrollTo ─► ArmSettleTimer
//! scroll ─► ScrollCoalescer ─► NavigationController::on_scroll
//!             │ suppressed: ArmSettleTimer
//!             └ idle:       resolve ─► SetLinks ─► SyncUrl(Replace)
//! timer  ─► NavigationController::on_settle ─► Idle
//! ```

pub mod active;
pub mod coalesce;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod history;
pub mod logging;
pub mod menu;
pub mod registry;
pub mod resolver;
pub mod section;
pub mod storage;
pub mod theme;
pub mod typewriter;

pub use active::LinkPatch;
pub use config::NavConfig;
pub use controller::{NavCmd, NavMode, NavigationController, NavigationState};
pub use error::NavError;
pub use history::{AddressBar, HistoryMode};
pub use registry::{AnchorSpec, LinkRegistry, NavLink};
pub use resolver::ScrollResolver;
pub use section::{Section, SectionId};
