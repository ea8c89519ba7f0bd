//! Tracing setup for the browser.
//!
//! Events are formatted on one line and written to the developer console at
//! the matching console level.

use std::fmt::{self, Write as _};
use tracing::{Event, Level, Subscriber, field::Field, field::Visit, level_filters::LevelFilter};
use tracing_subscriber::{
    Layer, layer::Context, layer::SubscriberExt, registry, util::SubscriberInitExt,
};
use wasm_bindgen::JsValue;

/// Layer that forwards events to `console.*`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut line = EventLine::default();
        event.record(&mut line);
        let text = JsValue::from_str(&line.render(*metadata.level(), metadata.target()));

        match *metadata.level() {
            Level::ERROR => web_sys::console::error_1(&text),
            Level::WARN => web_sys::console::warn_1(&text),
            Level::INFO => web_sys::console::info_1(&text),
            _ => web_sys::console::debug_1(&text),
        }
    }
}

#[derive(Debug, Default)]
struct EventLine {
    message: String,
    fields: String,
}

impl EventLine {
    fn push(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if name == "message" {
            let _ = self.message.write_fmt(value);
        } else {
            let _ = write!(self.fields, " {name}={value}");
        }
    }

    fn render(&self, level: Level, target: &str) -> String {
        format!("{level} {target}: {}{}", self.message, self.fields)
    }
}

impl Visit for EventLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field.name(), format_args!("{value}"));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field.name(), format_args!("{value:?}"));
    }
}

/// Install the console layer as the global subscriber.
///
/// Calling this twice leaves the first subscriber in place.
pub fn init(max_level: Level) {
    let installed = registry()
        .with(ConsoleLayer)
        .with(LevelFilter::from_level(max_level))
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
