//! crates/logging/src/context.rs
//! Thread-local stack of logging contexts.
//!
//! Every thread owns a stack whose bottom frame is an implicit, unnamed root
//! context, so there is always a current context to log through. Pushing a
//! context returns a [`ContextGuard`]; the guard pops the context again, either
//! explicitly through [`ContextGuard::pop`] or when it is dropped at the end of
//! its scope, including early returns and unwinding.
//!
//! # Resolution
//!
//! A context's minimum level is fixed when it is pushed: [`Level::Default`] is
//! replaced by the global level at that moment. Formatter and per-level sinks
//! are looked up when a record is emitted, first on the current context and
//! then on the global configuration. Intermediate ancestors are never
//! consulted, so a child that overrides only its warn sink still sends error
//! records to the global error sink even if its parent overrides that one.
//!
//! # Stack discipline
//!
//! Contexts are popped in strict LIFO order. Popping a context that is not
//! current, or finding that a nested context was leaked (for example through
//! [`std::mem::forget`]) when its parent goes out of scope, terminates the
//! process with a diagnostic and a backtrace. A thread that exits with
//! contexts still pushed, for example after forgetting a guard pushed directly
//! on the root, is reported the same way when its stack is torn down.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::{self, GlobalConfig};
use crate::emit;
use crate::fatal;
use crate::format::Formatter;
use crate::level::Level;
use crate::location::SourceLocation;
use crate::sink::{SharedSink, SinkTable};

const ROOT_ID: u64 = 0;

thread_local! {
    static STACK: RefCell<ContextStack> = RefCell::new(ContextStack::new());
}

struct Frame {
    id: u64,
    name: Arc<str>,
    level: Level,
    formatter: Option<Arc<dyn Formatter>>,
    sinks: SinkTable,
    declared_at: SourceLocation,
}

impl Frame {
    fn root() -> Self {
        Self {
            id: ROOT_ID,
            name: Arc::from(""),
            level: Level::Default,
            formatter: None,
            sinks: SinkTable::new(),
            declared_at: SourceLocation::none(),
        }
    }

    fn info(&self, depth: usize, global: &GlobalConfig) -> ContextInfo {
        ContextInfo {
            name: Arc::clone(&self.name),
            level: self.level.resolve(global.level()),
            declared_at: self.declared_at,
            depth,
        }
    }
}

struct ContextStack {
    frames: Vec<Frame>,
    next_id: u64,
}

impl ContextStack {
    fn new() -> Self {
        Self {
            frames: vec![Frame::root()],
            next_id: ROOT_ID + 1,
        }
    }

    fn top(&self) -> &Frame {
        // The root frame is never removed.
        &self.frames[self.frames.len() - 1]
    }

    fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.frames.iter().rposition(|frame| frame.id == id)
    }
}

impl Drop for ContextStack {
    fn drop(&mut self) {
        // The owning thread is exiting; any frame besides the root was leaked.
        if let Some(leaked) = self.frames.get(1) {
            fatal::panic_at(
                leaked.declared_at,
                format_args!("Logger '{}' wasn't popped!", leaked.name),
            );
        }
    }
}

/// Snapshot of a context, handed to formatters and returned by [`current`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextInfo {
    name: Arc<str>,
    level: Level,
    declared_at: SourceLocation,
    depth: usize,
}

impl ContextInfo {
    /// Builds a snapshot that is not backed by any stack frame.
    ///
    /// Useful for exercising formatters directly.
    #[must_use]
    pub fn detached(name: &str, level: Level) -> Self {
        Self {
            name: Arc::from(name),
            level,
            declared_at: SourceLocation::none(),
            depth: 0,
        }
    }

    /// Context name; empty for unnamed contexts and the root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective minimum level. Never [`Level::Default`] for live contexts.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Where the context was declared; empty for the root.
    #[must_use]
    pub const fn declared_at(&self) -> SourceLocation {
        self.declared_at
    }

    /// Number of contexts pushed below this one, excluding the root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Reports whether this snapshot describes the implicit root context.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// Namespace for creating contexts.
#[derive(Debug)]
pub enum Context {}

impl Context {
    /// Starts describing a new context.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::{Context, Level, location, ring_buffer_sink};
    ///
    /// let warnings = ring_buffer_sink(256);
    /// let guard = Context::builder()
    ///     .name("net")
    ///     .level(Level::Debug)
    ///     .sink(Level::Warn, warnings.clone())
    ///     .push(location!());
    /// assert_eq!(logging::current().name(), "net");
    /// guard.pop(location!());
    /// ```
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }
}

/// Description of a context that has not been pushed yet.
#[derive(Clone, Default)]
#[must_use = "a context does nothing until it is pushed"]
pub struct ContextBuilder {
    name: Arc<str>,
    level: Level,
    formatter: Option<Arc<dyn Formatter>>,
    sinks: SinkTable,
    declared_at: Option<SourceLocation>,
}

impl ContextBuilder {
    /// Sets the name shown in record headers.
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the minimum level. [`Level::Default`] inherits the global level at push time.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Overrides the formatter while this context is current.
    pub fn formatter<F>(self, formatter: F) -> Self
    where
        F: Formatter + 'static,
    {
        self.shared_formatter(Arc::new(formatter))
    }

    /// Overrides the formatter with an existing handle.
    pub fn shared_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Routes records of one level to `sink` while this context is current.
    pub fn sink(mut self, level: Level, sink: SharedSink) -> Self {
        self.sinks.set(level, sink);
        self
    }

    /// Records where the context is declared.
    ///
    /// Defaults to the location passed to [`push`](Self::push).
    pub fn declared_at(mut self, location: SourceLocation) -> Self {
        self.declared_at = Some(location);
        self
    }

    /// Pushes the context; shorthand for [`push`](crate::context::push).
    pub fn push(self, location: SourceLocation) -> ContextGuard {
        push(self, location)
    }
}

impl fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("formatter", &self.formatter.as_ref().map(|_| "custom"))
            .field("sinks", &self.sinks)
            .field("declared_at", &self.declared_at)
            .finish()
    }
}

/// Keeps a pushed context on the stack.
///
/// The guard is tied to the thread that pushed the context. Dropping it pops
/// the context if it is still current; [`pop`](Self::pop) does the same but
/// reports at an explicit location and treats an out-of-order pop as fatal.
#[must_use = "dropping the guard pops the context immediately"]
pub struct ContextGuard {
    id: u64,
    depth: usize,
    name: Arc<str>,
    declared_at: SourceLocation,
    linked: bool,
    _not_send: PhantomData<*const ()>,
}

impl ContextGuard {
    /// Name of the guarded context.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the guarded context was declared.
    #[must_use]
    pub const fn declared_at(&self) -> SourceLocation {
        self.declared_at
    }

    /// Stack depth of the guarded context; the first pushed context has depth 1.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Reports whether the guarded context is the current one.
    #[must_use]
    pub fn is_current(&self) -> bool {
        STACK
            .try_with(|stack| stack.borrow().top().id == self.id)
            .unwrap_or(false)
    }

    /// Pops the guarded context, restoring its parent as current.
    ///
    /// Terminates the process with `Cannot pop log!` when the context is not
    /// current.
    pub fn pop(mut self, location: SourceLocation) {
        self.detach(location);
    }

    fn detach(&mut self, location: SourceLocation) {
        if !self.is_current() {
            fatal::panic_at(location, format_args!("Cannot pop log!"));
        }

        emit::log_at(
            Level::Trace,
            location,
            format_args!(
                "Popped log declared at {}:{}",
                self.declared_at.file, self.declared_at.line
            ),
        );

        let frame = STACK.with(|stack| stack.borrow_mut().frames.pop());
        self.linked = false;
        // Overrides may own sinks with their own drop logic; release them
        // outside the stack borrow.
        drop(frame);
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        if !self.linked {
            return;
        }

        let leaked = STACK.try_with(|stack| {
            let stack = stack.borrow();
            let index = stack.position(self.id)?;
            let above = stack.frames.get(index + 1)?;
            Some((Arc::clone(&above.name), above.declared_at))
        });

        match leaked {
            Ok(None) => {
                let location = self.declared_at;
                self.detach(location);
            }
            Ok(Some((name, declared_at))) => {
                fatal::panic_at(
                    declared_at,
                    format_args!("Logger '{name}' wasn't popped!"),
                );
            }
            // The thread's stack is already gone; nothing is left to unlink.
            Err(_) => self.linked = false,
        }
    }
}

impl fmt::Debug for ContextGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextGuard")
            .field("name", &self.name)
            .field("depth", &self.depth)
            .field("declared_at", &self.declared_at)
            .field("linked", &self.linked)
            .finish()
    }
}

/// Pushes a new context on the current thread's stack.
///
/// The context's parent is the context that is current now. A trace record
/// `Pushed log declared at <file>:<line>` is emitted through the new context,
/// attributed to `location`.
pub fn push(builder: ContextBuilder, location: SourceLocation) -> ContextGuard {
    let level = builder.level.resolve(config::global_level());
    let declared_at = builder.declared_at.unwrap_or(location);
    let name = builder.name;

    let (id, depth) = STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let id = stack.next_id;
        stack.next_id += 1;
        stack.frames.push(Frame {
            id,
            name: Arc::clone(&name),
            level,
            formatter: builder.formatter,
            sinks: builder.sinks,
            declared_at,
        });
        (id, stack.depth())
    });

    emit::log_at(
        Level::Trace,
        location,
        format_args!(
            "Pushed log declared at {}:{}",
            declared_at.file, declared_at.line
        ),
    );

    ContextGuard {
        id,
        depth,
        name,
        declared_at,
        linked: true,
        _not_send: PhantomData,
    }
}

/// Runs `f` inside a freshly pushed context and pops it afterwards.
///
/// # Examples
///
/// ```
/// use logging::{Context, Level};
///
/// let depth = logging::scope(Context::builder().name("job").level(Level::Warn), || {
///     assert_eq!(logging::current().level(), Level::Warn);
///     logging::depth()
/// });
/// assert_eq!(depth, logging::depth() + 1);
/// ```
#[track_caller]
pub fn scope<R>(builder: ContextBuilder, f: impl FnOnce() -> R) -> R {
    let location = SourceLocation::caller();
    let guard = push(builder, location);
    let result = f();
    guard.pop(location);
    result
}

/// Snapshot of the current context.
pub fn current() -> ContextInfo {
    let global = config::global();
    STACK
        .try_with(|stack| {
            let stack = stack.borrow();
            stack.top().info(stack.depth(), global)
        })
        .unwrap_or_else(|_| Frame::root().info(0, global))
}

/// Number of contexts pushed on this thread, excluding the root.
pub fn depth() -> usize {
    STACK
        .try_with(|stack| stack.borrow().depth())
        .unwrap_or(0)
}

/// Reports whether a record at `level` passes the current context's filter.
pub fn enabled(level: Level) -> bool {
    let declared = STACK
        .try_with(|stack| stack.borrow().top().level)
        .unwrap_or(Level::Default);
    level.passes(declared.resolve(config::global_level()))
}

/// Formatter, sink, and context snapshot that one emission will use.
pub(crate) struct Target {
    pub(crate) info: ContextInfo,
    pub(crate) formatter: Arc<dyn Formatter>,
    pub(crate) sink: Option<SharedSink>,
}

pub(crate) fn target(level: Level) -> Target {
    let global = config::global();
    let resolve = |frame: &Frame, depth: usize| Target {
        info: frame.info(depth, global),
        formatter: frame
            .formatter
            .clone()
            .unwrap_or_else(|| Arc::clone(global.formatter())),
        sink: frame
            .sinks
            .get(level)
            .or_else(|| global.sink(level))
            .cloned(),
    };

    STACK
        .try_with(|stack| {
            let stack = stack.borrow();
            resolve(stack.top(), stack.depth())
        })
        .unwrap_or_else(|_| resolve(&Frame::root(), 0))
}
