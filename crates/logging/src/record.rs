//! crates/logging/src/record.rs
//! One rendered log line handed to a sink.

use std::borrow::Cow;

use crate::level::Level;
use crate::location::SourceLocation;

/// A fully rendered log entry.
///
/// The message is a view into the engine's format buffer and the logger name
/// is borrowed from the emitting context. Both are valid only for the duration
/// of [`Sink::write`](crate::Sink::write); sinks that keep record contents
/// must copy them.
#[derive(Copy, Clone, Debug)]
pub struct Record<'a> {
    logger_name: &'a str,
    level: Level,
    location: SourceLocation,
    message: &'a [u8],
}

impl<'a> Record<'a> {
    /// Creates a record from its parts.
    #[must_use]
    pub const fn new(
        logger_name: &'a str,
        level: Level,
        location: SourceLocation,
        message: &'a [u8],
    ) -> Self {
        Self {
            logger_name,
            level,
            location,
            message,
        }
    }

    /// Name of the context that emitted the record; empty for unnamed contexts.
    #[must_use]
    pub const fn logger_name(&self) -> &'a str {
        self.logger_name
    }

    /// Severity of the record.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Call site that emitted the record.
    #[must_use]
    pub const fn location(&self) -> SourceLocation {
        self.location
    }

    /// Rendered message bytes, without any trailing newline or terminator.
    #[must_use]
    pub const fn message(&self) -> &'a [u8] {
        self.message
    }

    /// Length of the rendered message in bytes.
    #[must_use]
    pub const fn message_len(&self) -> usize {
        self.message.len()
    }

    /// The message decoded as UTF-8, replacing bytes split by truncation.
    #[must_use]
    pub fn message_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_parts() {
        let loc = SourceLocation::new("a.rs", "f", 3);
        let record = Record::new("net", Level::Warn, loc, b"timeout");

        assert_eq!(record.logger_name(), "net");
        assert_eq!(record.level(), Level::Warn);
        assert_eq!(record.location(), loc);
        assert_eq!(record.message(), b"timeout");
        assert_eq!(record.message_len(), 7);
    }

    #[test]
    fn lossy_view_replaces_split_sequences() {
        // "é" is two bytes; keep only the first.
        let bytes = "caf\u{e9}".as_bytes();
        let record = Record::new("", Level::Info, SourceLocation::none(), &bytes[..4]);
        assert_eq!(record.message_lossy(), "caf\u{fffd}");
    }
}
