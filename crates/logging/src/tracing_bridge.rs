//! crates/logging/src/tracing_bridge.rs
//! Bridge from the `tracing` crate into the thread-local context stack.
//!
//! [`ContextLayer`] is a `tracing-subscriber` layer that forwards every event to
//! the context that is current on the emitting thread. The event is filtered by
//! that context's level, rendered by its formatter, and routed to its sinks, so
//! libraries instrumented with `tracing` show up next to records emitted with
//! the crate's own macros.
//!
//! # Level mapping
//!
//! | tracing | logging |
//! |---------|---------|
//! | `TRACE` | [`Level::Trace`] |
//! | `DEBUG` | [`Level::Debug`] |
//! | `INFO`  | [`Level::Info`]  |
//! | `WARN`  | [`Level::Warn`]  |
//! | `ERROR` | [`Level::Error`] |
//!
//! Nothing maps to [`Level::Panic`]; a `tracing` event never terminates the
//! process.
//!
//! # Usage
//!
//! ```rust,ignore
//! logging::init_tracing();
//! tracing::warn!(attempt = 3, "retrying");
//! // -> "src/main.rs:2   [warn]: retrying attempt=3"
//! ```

use std::fmt::{self, Write as _};

use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::emit;
use crate::level::Level;
use crate::location::SourceLocation;

/// A tracing layer that re-emits events through the current logging context.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextLayer {
    _private: (),
}

impl ContextLayer {
    /// Creates the layer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Maps a tracing level to a logging level.
    #[must_use]
    pub const fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

impl<S> Layer<S> for ContextLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::map_level(metadata.level());
        if !crate::context::enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let location = SourceLocation::new(
            metadata.file().unwrap_or(""),
            metadata.module_path().unwrap_or(""),
            metadata.line().unwrap_or(0),
        );
        emit::log(level, location, format_args!("{}", visitor.finish()));
    }
}

/// Collects the `message` field followed by the remaining fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={value}", field.name());
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.push_field(field, format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field, format_args!("{value}"));
        }
    }
}

/// Installs a global `tracing` subscriber that forwards into the context stack.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(ContextLayer::new())
        .try_init()
        .is_ok()
}
