//! crates/logging/src/sink/mod.rs
//! Output destinations for rendered records.
//!
//! A [`Sink`] receives every [`Record`] routed to it and decides what to do with
//! the bytes. Two destinations ship with the crate: [`FdSink`] appends to a file
//! descriptor and [`RingBufferSink`] keeps a bounded, continuously overwritten
//! history in memory. Sinks are shared through [`SharedSink`] handles so one
//! destination can serve several levels, contexts, and the global defaults at
//! once; the handle keeps the sink state alive for as long as anything routes
//! to it.

mod fd;
mod ring_buffer;

use std::fmt;
use std::sync::Arc;

use crate::level::Level;
use crate::record::Record;

pub use fd::{FdSink, stderr_sink, stdout_sink};
pub use ring_buffer::{RingBuffer, RingBufferSink, ring_buffer_sink};

/// A destination for rendered records.
///
/// Writes are best-effort. A sink never reports failure to the caller; logging
/// must not be able to take the host program down through an I/O error.
pub trait Sink: Send + Sync {
    /// Consumes one record. The record is only valid for the duration of the call.
    fn write(&self, record: &Record<'_>);
}

/// Reference-counted handle to a sink.
pub type SharedSink = Arc<dyn Sink>;

impl<S> Sink for Arc<S>
where
    S: Sink + ?Sized,
{
    fn write(&self, record: &Record<'_>) {
        (**self).write(record);
    }
}

/// Sink that discards every record.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl Sink for NullSink {
    #[inline]
    fn write(&self, _record: &Record<'_>) {}
}

/// At most one sink per [`Level`].
#[derive(Clone, Default)]
pub struct SinkTable {
    slots: [Option<SharedSink>; Level::COUNT],
}

impl SinkTable {
    /// Creates a table with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sink assigned to `level`, if any.
    #[must_use]
    pub fn get(&self, level: Level) -> Option<&SharedSink> {
        self.slots[level.index()].as_ref()
    }

    /// Assigns `sink` to `level`, returning the previous occupant.
    pub fn set(&mut self, level: Level, sink: SharedSink) -> Option<SharedSink> {
        self.slots[level.index()].replace(sink)
    }

    /// Clears the slot for `level`, returning its occupant.
    pub fn remove(&mut self, level: Level) -> Option<SharedSink> {
        self.slots[level.index()].take()
    }

    /// Reports whether no level has a sink.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Levels that currently have a sink, in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        Level::ALL
            .into_iter()
            .filter(|level| self.slots[level.index()].is_some())
    }
}

impl fmt::Debug for SinkTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.levels()).finish()
    }
}
