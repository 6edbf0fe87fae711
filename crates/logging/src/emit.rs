//! crates/logging/src/emit.rs
//! Record emission: format into a stack buffer, then hand the record to a sink.

use std::fmt;

use crate::context;
use crate::fatal;
use crate::format::MESSAGE_BUFFER_SIZE;
use crate::level::Level;
use crate::location::SourceLocation;
use crate::record::Record;

/// Emits a record through the current context without checking its level.
///
/// Callers filter with [`enabled`](crate::enabled) first so that arguments of
/// disabled records are never rendered; the level macros do this for you.
/// A level with no sink, neither on the context nor globally, is formatted and
/// then dropped.
///
/// A [`Level::Panic`] record terminates the process once it has been written,
/// the same way [`panic_log!`](crate::panic_log) does.
pub fn log(level: Level, location: SourceLocation, args: fmt::Arguments<'_>) {
    let target = context::target(level);

    let mut buf = [0u8; MESSAGE_BUFFER_SIZE];
    let reported = target
        .formatter
        .format(&mut buf, &target.info, level, location, args);
    let len = reported.min(MESSAGE_BUFFER_SIZE - 1);

    if let Some(sink) = target.sink {
        let record = Record::new(target.info.name(), level, location, &buf[..len]);
        sink.write(&record);
    }

    if level == Level::Panic {
        fatal::terminate_with_backtrace();
    }
}

/// Emits a record if the current context lets `level` through.
pub fn log_at(level: Level, location: SourceLocation, args: fmt::Arguments<'_>) {
    if context::enabled(level) {
        log(level, location, args);
    }
}
