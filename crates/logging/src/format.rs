//! crates/logging/src/format.rs
//! Formatters render a message template and its arguments into a bounded buffer.
//!
//! The engine owns a stack buffer of [`MESSAGE_BUFFER_SIZE`] bytes and lends it
//! to the resolved [`Formatter`]. A formatter writes as much as fits, keeping the
//! final byte free for a terminator, and reports how many bytes it produced. The
//! engine clamps that answer to the buffer, so a formatter that over-reports can
//! never cause a record to reach past the rendered bytes.

use std::fmt::{self, Write as _};

use crate::context::ContextInfo;
use crate::level::Level;
use crate::location::SourceLocation;

/// Byte budget shared by the engine and every formatter.
pub const MESSAGE_BUFFER_SIZE: usize = 1024;

/// Renders one record into a caller-supplied buffer.
///
/// Implementations return the number of bytes they produced. Values larger than
/// the buffer are tolerated and clamped by the engine.
pub trait Formatter: Send + Sync {
    /// Writes the rendered record into `buf` and returns its length.
    fn format(
        &self,
        buf: &mut [u8],
        context: &ContextInfo,
        level: Level,
        location: SourceLocation,
        args: fmt::Arguments<'_>,
    ) -> usize;
}

impl<F> Formatter for F
where
    F: Fn(&mut [u8], &ContextInfo, Level, SourceLocation, fmt::Arguments<'_>) -> usize
        + Send
        + Sync,
{
    fn format(
        &self,
        buf: &mut [u8],
        context: &ContextInfo,
        level: Level,
        location: SourceLocation,
        args: fmt::Arguments<'_>,
    ) -> usize {
        self(buf, context, level, location, args)
    }
}

/// [`fmt::Write`] adapter over a byte slice that truncates instead of failing.
///
/// The last byte of the slice is reserved for a terminator and never written.
/// Output past that point is dropped, but still counted by
/// [`wanted`](Self::wanted) so callers can detect truncation.
#[derive(Debug)]
pub struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
    wanted: usize,
}

impl<'a> BoundedWriter<'a> {
    /// Wraps `buf`; at most `buf.len() - 1` bytes will be written.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            written: 0,
            wanted: 0,
        }
    }

    /// Bytes actually stored in the buffer.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Bytes that would have been stored given unlimited space.
    #[must_use]
    pub const fn wanted(&self) -> usize {
        self.wanted
    }

    /// Reports whether any output was dropped.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.wanted > self.written
    }

    /// Appends raw bytes, truncating at the limit.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.wanted = self.wanted.saturating_add(bytes.len());
        let limit = self.buf.len().saturating_sub(1);
        let room = limit.saturating_sub(self.written);
        let take = bytes.len().min(room);
        self.buf[self.written..self.written + take].copy_from_slice(&bytes[..take]);
        self.written += take;
    }

    /// The bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.written]
    }
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}

/// Formatter used when neither the context nor the global configuration names one.
///
/// Produces `"<file>:<line> [<name>:<level>]: <message>"`, or
/// `"<file>:<line> [<level>]: <message>"` for unnamed contexts. The line number
/// is left-aligned in a three character column.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {
    fn format(
        &self,
        buf: &mut [u8],
        context: &ContextInfo,
        level: Level,
        location: SourceLocation,
        args: fmt::Arguments<'_>,
    ) -> usize {
        default_format(buf, context, level, location, args)
    }
}

/// Function form of [`DefaultFormatter`], usable from custom formatters.
pub fn default_format(
    buf: &mut [u8],
    context: &ContextInfo,
    level: Level,
    location: SourceLocation,
    args: fmt::Arguments<'_>,
) -> usize {
    let file = if location.file.is_empty() {
        "?"
    } else {
        location.file
    };

    let mut out = BoundedWriter::new(buf);
    let _ = if context.name().is_empty() {
        write!(out, "{file}:{:<3} [{level}]: ", location.line)
    } else {
        write!(
            out,
            "{file}:{:<3} [{}:{level}]: ",
            location.line,
            context.name()
        )
    };
    let _ = out.write_fmt(args);
    out.written()
}
