//! crates/logging/src/fatal.rs
//! Non-recoverable paths: failed assertions, panic-level records, and stack
//! discipline violations.
//!
//! Each path emits one panic-level record through the current context, flushes
//! standard output, prints a backtrace to standard error, and aborts. Nothing
//! here unwinds, so destructors and `catch_unwind` boundaries are skipped.

use std::backtrace::Backtrace;
use std::fmt::{self, Write as _};
use std::io::{self, Write as _};
use std::process;

use crate::emit;
use crate::format::{BoundedWriter, MESSAGE_BUFFER_SIZE};
use crate::level::Level;
use crate::location::SourceLocation;

/// Flushes pending output, prints a backtrace to standard error, and aborts.
#[cold]
#[inline(never)]
pub fn terminate_with_backtrace() -> ! {
    let _ = io::stdout().flush();

    let backtrace = Backtrace::force_capture();
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{backtrace}");
    let _ = stderr.flush();

    process::abort()
}

/// Emits a panic-level record at `location` and terminates.
///
/// Runs whether or not assertions are enabled.
#[cold]
pub fn panic_at(location: SourceLocation, args: fmt::Arguments<'_>) -> ! {
    emit::log(Level::Panic, location, args);
    // Unreachable: `emit::log` has already terminated.
    terminate_with_backtrace()
}

/// Reports a failed assertion on `condition` and terminates.
///
/// The record reads `'<condition>' failed.`, followed by a space and the
/// rendered message when that message is not empty.
#[cold]
pub fn assert_failed(
    location: SourceLocation,
    condition: &str,
    args: fmt::Arguments<'_>,
) -> ! {
    let mut detail = [0u8; MESSAGE_BUFFER_SIZE];
    let mut detail_out = BoundedWriter::new(&mut detail);
    let _ = detail_out.write_fmt(args);

    let mut buf = [0u8; MESSAGE_BUFFER_SIZE];
    let mut out = BoundedWriter::new(&mut buf);
    let _ = write!(out, "'{condition}' failed.");
    if detail_out.written() > 0 {
        out.push_bytes(b" ");
        out.push_bytes(detail_out.as_bytes());
    }

    let message = String::from_utf8_lossy(out.as_bytes());
    panic_at(location, format_args!("{message}"))
}
