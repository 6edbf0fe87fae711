//! Integration tests for the bounded formatting contract.
//!
//! Formatters write into a buffer of `MESSAGE_BUFFER_SIZE` bytes and report a
//! length. Whatever they report, the record handed to the sink never extends
//! past the rendered buffer.

use std::fmt;
use std::sync::{Arc, Mutex};

use logging::{
    Context, ContextInfo, Level, LogConfig, MESSAGE_BUFFER_SIZE, Record, Sink, SourceLocation,
    location,
};

/// Remembers the length and bytes of every record.
#[derive(Default)]
struct LengthProbe {
    seen: Mutex<Vec<Vec<u8>>>,
}

impl LengthProbe {
    fn seen(&self) -> Vec<Vec<u8>> {
        self.seen.lock().expect("lock").clone()
    }
}

impl Sink for LengthProbe {
    fn write(&self, record: &Record<'_>) {
        assert_eq!(record.message_len(), record.message().len());
        self.seen.lock().expect("lock").push(record.message().to_vec());
    }
}

fn emit_with<F>(formatter: F, args: fmt::Arguments<'_>) -> Vec<Vec<u8>>
where
    F: logging::Formatter + 'static,
{
    logging::init(LogConfig::new());
    let probe = Arc::new(LengthProbe::default());
    let guard = Context::builder()
        .formatter(formatter)
        .sink(Level::Error, probe.clone())
        .push(location!());
    logging::log(Level::Error, location!(), args);
    guard.pop(location!());
    probe.seen()
}

fn over_reporting(
    buf: &mut [u8],
    _: &ContextInfo,
    _: Level,
    _: SourceLocation,
    _: fmt::Arguments<'_>,
) -> usize {
    buf.fill(b'#');
    buf.len() * 4
}

fn under_reporting(
    buf: &mut [u8],
    _: &ContextInfo,
    _: Level,
    _: SourceLocation,
    _: fmt::Arguments<'_>,
) -> usize {
    buf[..5].copy_from_slice(b"hello");
    2
}

fn buffer_size_probe(
    buf: &mut [u8],
    _: &ContextInfo,
    _: Level,
    _: SourceLocation,
    _: fmt::Arguments<'_>,
) -> usize {
    assert_eq!(buf.len(), MESSAGE_BUFFER_SIZE);
    assert!(buf.iter().all(|&b| b == 0), "buffer must start zeroed");
    0
}

/// Verifies an inflated length is clamped to the buffer minus the terminator.
#[test]
fn over_reported_length_is_clamped() {
    let seen = emit_with(over_reporting, format_args!("ignored"));
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), MESSAGE_BUFFER_SIZE - 1);
    assert!(seen[0].iter().all(|&b| b == b'#'));
}

/// Verifies a short reported length is taken at face value.
#[test]
fn under_reported_length_is_respected() {
    let seen = emit_with(under_reporting, format_args!("ignored"));
    assert_eq!(seen, vec![b"he".to_vec()]);
}

/// Verifies formatters receive a zeroed buffer of the agreed size.
#[test]
fn formatter_sees_full_zeroed_buffer() {
    let seen = emit_with(buffer_size_probe, format_args!("x"));
    assert_eq!(seen, vec![Vec::<u8>::new()]);
}

/// Verifies the default formatter truncates long bodies but keeps the header.
#[test]
fn default_formatter_truncates_long_messages() {
    let long = "y".repeat(5 * MESSAGE_BUFFER_SIZE);
    let seen = emit_with(logging::DefaultFormatter, format_args!("{long}"));

    assert_eq!(seen.len(), 1);
    let message = &seen[0];
    assert_eq!(message.len(), MESSAGE_BUFFER_SIZE - 1);
    let header = format!("{}:", file!());
    assert!(message.starts_with(header.as_bytes()));
    assert!(message.ends_with(b"yyyy"));
}
