#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides leveled, hierarchical diagnostics for programs that want
//! control over where each severity ends up. Records are emitted through a
//! thread-local stack of *contexts*. Each context carries a name, a minimum
//! level, an optional formatter, and up to one sink override per level. The
//! implicit root context at the bottom of every thread's stack falls back to a
//! process-wide [`GlobalConfig`].
//!
//! # Design
//!
//! - [`Context::builder`] describes a context, [`push`] activates it, and the
//!   returned [`ContextGuard`] pops it again on every exit path from its scope.
//!   [`scoped_log!`] does both at the invocation site.
//! - Level filtering happens before any argument is rendered: the
//!   [`info_log!`]-style macros consult [`enabled`] and only then build their
//!   [`fmt::Arguments`](std::fmt::Arguments).
//! - A [`Formatter`] renders into a [`MESSAGE_BUFFER_SIZE`] stack buffer; the
//!   resulting [`Record`] goes to one [`Sink`]. [`FdSink`] writes to a file
//!   descriptor and [`RingBufferSink`] keeps a bounded in-memory history.
//! - [`init`] installs the global configuration once; later calls are ignored.
//!
//! # Invariants
//!
//! - Every thread always has a current context.
//! - Contexts are popped in LIFO order. Violations, failed [`assert_log!`]
//!   checks, and [`panic_log!`] records terminate the process after printing a
//!   backtrace.
//! - A level with no sink anywhere is silently dropped.
//!
//! # Examples
//!
//! ```
//! use logging::{Level, LogConfig, ring_buffer_sink, scoped_log};
//!
//! logging::init(LogConfig::new().level(Level::Info));
//!
//! let memory = ring_buffer_sink(1024);
//! {
//!     let _log = scoped_log!(
//!         name = "cache",
//!         level = Level::Debug,
//!         sinks[Level::Debug] = memory.clone(),
//!     );
//!     logging::debug_log!("evicted {} entries", 12);
//! }
//! logging::debug_log!("not shown, the root context is at info");
//!
//! let lines = memory.lines();
//! assert_eq!(lines.len(), 1);
//! assert!(lines[0].ends_with("[cache:debug]: evicted 12 entries"));
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Level`].
//! - `tracing`: a `tracing-subscriber` layer that forwards `tracing` events
//!   into the current context.

pub mod config;
pub mod context;
pub mod emit;
pub mod fatal;
pub mod format;
pub mod level;
pub mod location;
mod macros;
pub mod record;
pub mod sink;

#[cfg(feature = "tracing")]
pub mod tracing_bridge;

pub use config::{
    ConfigError, GlobalConfig, LogConfig, asserts_enabled, global, global_level, init,
    is_initialized,
};
pub use context::{
    Context, ContextBuilder, ContextGuard, ContextInfo, current, depth, enabled, push, scope,
};
pub use emit::{log, log_at};
pub use fatal::{assert_failed, panic_at, terminate_with_backtrace};
pub use format::{BoundedWriter, DefaultFormatter, Formatter, MESSAGE_BUFFER_SIZE, default_format};
pub use level::{Level, ParseLevelError};
pub use location::SourceLocation;
pub use record::Record;
pub use sink::{
    FdSink, NullSink, RingBuffer, RingBufferSink, SharedSink, Sink, SinkTable, ring_buffer_sink,
    stderr_sink, stdout_sink,
};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{ContextLayer, init_tracing};
