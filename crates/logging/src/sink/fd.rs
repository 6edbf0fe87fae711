//! crates/logging/src/sink/fd.rs
//! Append-only sink over a raw file descriptor.

use std::sync::{Arc, OnceLock};

use super::{SharedSink, Sink};
use crate::record::Record;

/// Writes each record followed by a newline to a file descriptor.
///
/// Writes are best-effort: short writes and errors are ignored, and a negative
/// descriptor turns the sink into a no-op. The sink does not own the
/// descriptor and never closes it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FdSink {
    fd: i32,
}

impl FdSink {
    /// Descriptor of standard output.
    pub const STDOUT: Self = Self { fd: 1 };
    /// Descriptor of standard error.
    pub const STDERR: Self = Self { fd: 2 };

    /// Wraps `fd`.
    #[must_use]
    pub const fn new(fd: i32) -> Self {
        Self { fd }
    }

    /// The wrapped descriptor.
    #[must_use]
    pub const fn fd(&self) -> i32 {
        self.fd
    }

    fn write_bytes(&self, bytes: &[u8]) {
        if self.fd < 0 || bytes.is_empty() {
            return;
        }
        raw_write(self.fd, bytes);
    }
}

impl Sink for FdSink {
    fn write(&self, record: &Record<'_>) {
        self.write_bytes(record.message());
        self.write_bytes(b"\n");
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn raw_write(fd: i32, bytes: &[u8]) {
    // SAFETY: `bytes` is a live slice for the duration of the call and write(2)
    // reads at most `bytes.len()` bytes from it. An invalid descriptor only
    // yields EBADF, which is ignored.
    let _ = unsafe { libc::write(fd, bytes.as_ptr().cast(), bytes.len()) };
}

#[cfg(not(unix))]
fn raw_write(fd: i32, bytes: &[u8]) {
    use std::io::Write as _;

    let _ = match fd {
        1 => std::io::stdout().lock().write_all(bytes),
        2 => std::io::stderr().lock().write_all(bytes),
        _ => Ok(()),
    };
}

/// Shared sink writing to standard output.
pub fn stdout_sink() -> SharedSink {
    static STDOUT: OnceLock<SharedSink> = OnceLock::new();
    Arc::clone(STDOUT.get_or_init(|| Arc::new(FdSink::STDOUT)))
}

/// Shared sink writing to standard error.
pub fn stderr_sink() -> SharedSink {
    static STDERR: OnceLock<SharedSink> = OnceLock::new();
    Arc::clone(STDERR.get_or_init(|| Arc::new(FdSink::STDERR)))
}
