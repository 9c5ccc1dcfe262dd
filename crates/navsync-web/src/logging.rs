#![forbid(unsafe_code)]

//! Browser console sink for `tracing` events.
//!
//! Enabled with the `console-logging` feature. Events at or below the
//! configured level are formatted as `LEVEL target: message key=value ...`
//! and routed to `console.error` / `console.warn` / `console.log`.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsValue;

/// Install the console layer as the global subscriber. Safe to call more than
/// once; later calls are ignored.
pub(crate) fn init(max_level: Level) {
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer.with_filter(LevelFilter::from_level(max_level)))
        .try_init();
}

struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut line = format!("{} {}: ", meta.level(), meta.target());
        event.record(&mut LineVisitor(&mut line));

        let line = JsValue::from_str(&line);
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

struct LineVisitor<'a>(&'a mut String);

impl Visit for LineVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        } else {
            let _ = write!(self.0, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.0, "{value:?}");
        } else {
            let _ = write!(self.0, " {}={:?}", field.name(), value);
        }
    }
}
