//! Integration tests for sink and formatter resolution.
//!
//! Sinks and formatters are resolved at emission time: the current context's
//! override wins, otherwise the global default applies. Overrides on
//! intermediate ancestors are never consulted.

mod common;

use std::fmt;
use std::sync::{Arc, Mutex};

use logging::{
    BoundedWriter, Context, ContextInfo, Level, NullSink, Record, Sink, SourceLocation,
    error_log, info_log, location, ring_buffer_sink, scoped_log, warn_log,
};

/// Sink that keeps owned copies of every record it sees.
#[derive(Default)]
struct Collector {
    records: Mutex<Vec<(String, Level, String)>>,
}

impl Collector {
    fn take(&self) -> Vec<(String, Level, String)> {
        std::mem::take(&mut *self.records.lock().expect("lock"))
    }
}

impl Sink for Collector {
    fn write(&self, record: &Record<'_>) {
        self.records.lock().expect("lock").push((
            record.logger_name().to_owned(),
            record.level(),
            record.message_lossy().into_owned(),
        ));
    }
}

fn bracketed(
    buf: &mut [u8],
    _: &ContextInfo,
    level: Level,
    _: SourceLocation,
    args: fmt::Arguments<'_>,
) -> usize {
    use fmt::Write as _;
    let mut out = BoundedWriter::new(buf);
    let _ = write!(out, "<{level}> {args}");
    out.written()
}

// ============================================================================
// Overrides
// ============================================================================

/// Verifies a warn override receives warn records and nothing else sees them.
#[test]
fn warn_override_captures_warn_only() {
    let rings = common::setup();
    let override_sink = ring_buffer_sink(1024);

    let guard = Context::builder()
        .level(Level::Trace)
        .sink(Level::Warn, override_sink.clone())
        .push(location!());
    warn_log!("override-warn-marker");
    error_log!("override-error-marker");
    guard.pop(location!());

    assert!(common::contains(&override_sink, "override-warn-marker"));
    assert!(!rings.any_contains("override-warn-marker"));

    assert!(!common::contains(&override_sink, "override-error-marker"));
    assert!(common::contains(rings.get(Level::Error), "override-error-marker"));
}

/// Verifies a child's missing override falls back to the global default,
/// skipping the parent's override for that level.
#[test]
fn child_skips_parent_override() {
    let rings = common::setup();
    let parent_error = ring_buffer_sink(1024);
    let child_warn = ring_buffer_sink(1024);

    let parent = Context::builder()
        .sink(Level::Error, parent_error.clone())
        .push(location!());
    let child = Context::builder()
        .sink(Level::Warn, child_warn.clone())
        .push(location!());

    warn_log!("inherit-child-warn");
    error_log!("inherit-child-error");
    child.pop(location!());
    error_log!("inherit-parent-error");
    parent.pop(location!());

    assert!(common::contains(&child_warn, "inherit-child-warn"));
    assert!(common::contains(rings.get(Level::Error), "inherit-child-error"));
    assert!(!common::contains(&parent_error, "inherit-child-error"));
    assert!(common::contains(&parent_error, "inherit-parent-error"));
}

/// Verifies one sink can serve several levels with the record's level intact.
#[test]
fn one_sink_for_several_levels() {
    common::setup();
    let collector = Arc::new(Collector::default());

    let guard = Context::builder()
        .name("multi")
        .sink(Level::Info, collector.clone())
        .sink(Level::Error, collector.clone())
        .formatter(bracketed)
        .push(location!());
    info_log!("first");
    error_log!("second {}", 2);
    guard.pop(location!());

    assert_eq!(
        collector.take(),
        vec![
            ("multi".to_owned(), Level::Info, "<info> first".to_owned()),
            ("multi".to_owned(), Level::Error, "<error> second 2".to_owned()),
        ]
    );
}

/// Verifies a `NullSink` override silences a level.
#[test]
fn null_sink_swallows_records() {
    let rings = common::setup();
    let _log = scoped_log!(sinks[Level::Error] = Arc::new(NullSink));
    error_log!("swallowed-by-null-sink");
    assert!(!rings.any_contains("swallowed-by-null-sink"));
}

/// Verifies emitting at a level without any sink is tolerated.
#[test]
fn missing_sink_is_tolerated() {
    common::setup();
    assert!(logging::global().sink(Level::Default).is_none());
    logging::log(Level::Default, location!(), format_args!("no destination"));
}

// ============================================================================
// Formatter Resolution
// ============================================================================

/// Verifies formatter overrides apply to the current context only.
#[test]
fn formatter_override_is_not_inherited() {
    common::setup();
    let ring = ring_buffer_sink(2048);

    let parent = Context::builder()
        .name("fmt-parent")
        .formatter(bracketed)
        .sink(Level::Info, ring.clone())
        .push(location!());
    info_log!("from parent");
    let child = Context::builder()
        .name("fmt-child")
        .sink(Level::Info, ring.clone())
        .push(location!());
    info_log!("from child");
    child.pop(location!());
    parent.pop(location!());

    let lines = ring.lines();
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert_eq!(lines[0], "<info> from parent");
    assert!(lines[1].ends_with("[fmt-child:info]: from child"), "{lines:?}");
}

// ============================================================================
// Sharing
// ============================================================================

/// Verifies a sink shared across threads keeps every record whole.
#[test]
fn sink_shared_across_threads() {
    common::setup();
    let collector = Arc::new(Collector::default());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let collector = collector.clone();
            std::thread::spawn(move || {
                let _log = Context::builder()
                    .name(format!("w{worker}"))
                    .formatter(bracketed)
                    .sink(Level::Info, collector)
                    .push(location!());
                for step in 0..25 {
                    info_log!("worker {worker} step {step}");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    let records = collector.take();
    assert_eq!(records.len(), 100);
    for worker in 0..4 {
        let name = format!("w{worker}");
        let steps: Vec<_> = records
            .iter()
            .filter(|(logger, _, _)| *logger == name)
            .map(|(_, _, message)| message.clone())
            .collect();
        let expected: Vec<_> = (0..25)
            .map(|step| format!("<info> worker {worker} step {step}"))
            .collect();
        assert_eq!(steps, expected);
    }
}
