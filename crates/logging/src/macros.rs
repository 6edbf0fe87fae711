//! crates/logging/src/macros.rs
//! Level-specific emission macros, assertions, and scoped contexts.
//!
//! Each level macro checks the current context's filter before building its
//! [`format_args!`](core::format_args), so arguments of disabled records are
//! never evaluated. Every macro also accepts a leading `at = <location>,` to
//! attribute the record to a location other than the invocation site.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at_level {
    ($level:expr, $loc:expr, $($arg:tt)+) => {{
        let level: $crate::Level = $level;
        if $crate::enabled(level) {
            $crate::log(level, $loc, ::core::format_args!($($arg)+));
        }
    }};
}

/// Emits a trace record.
///
/// ```
/// logging::trace_log!("entering {}", "resolve");
/// logging::trace_log!(at = logging::SourceLocation::none(), "no location");
/// ```
#[macro_export]
macro_rules! trace_log {
    (at = $loc:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Trace, $loc, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Trace, $crate::location!(), $($arg)+)
    };
}

/// Emits a debug record.
#[macro_export]
macro_rules! debug_log {
    (at = $loc:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Debug, $loc, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Debug, $crate::location!(), $($arg)+)
    };
}

/// Emits an info record.
///
/// ```
/// let peers = 3;
/// logging::info_log!("connected to {peers} peers");
/// ```
#[macro_export]
macro_rules! info_log {
    (at = $loc:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Info, $loc, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Info, $crate::location!(), $($arg)+)
    };
}

/// Emits a warn record.
#[macro_export]
macro_rules! warn_log {
    (at = $loc:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Warn, $loc, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Warn, $crate::location!(), $($arg)+)
    };
}

/// Emits an error record.
#[macro_export]
macro_rules! error_log {
    (at = $loc:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Error, $loc, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__log_at_level!($crate::Level::Error, $crate::location!(), $($arg)+)
    };
}

/// Emits a panic record and terminates the process.
///
/// Termination happens even when assertions are disabled.
#[macro_export]
macro_rules! panic_log {
    (at = $loc:expr, $($arg:tt)+) => {
        $crate::panic_at($loc, ::core::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::panic_log!(at = $crate::location!(), $($arg)+)
    };
}

/// Terminates the process when `cond` is false.
///
/// The condition is evaluated only while assertions are enabled. On failure a
/// panic record `'<cond>' failed.` is emitted, followed by the optional
/// message.
///
/// ```
/// let items = vec![1, 2, 3];
/// logging::assert_log!(!items.is_empty());
/// logging::assert_log!(items.len() == 3, "expected three items, got {}", items.len());
/// ```
#[macro_export]
macro_rules! assert_log {
    (at = $loc:expr, $cond:expr $(,)?) => {
        if $crate::asserts_enabled() && !$cond {
            $crate::assert_failed($loc, ::core::stringify!($cond), ::core::format_args!(""));
        }
    };
    (at = $loc:expr, $cond:expr, $($arg:tt)+) => {
        if $crate::asserts_enabled() && !$cond {
            $crate::assert_failed(
                $loc,
                ::core::stringify!($cond),
                ::core::format_args!($($arg)+),
            );
        }
    };
    ($cond:expr $(,)?) => {
        $crate::assert_log!(at = $crate::location!(), $cond)
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::assert_log!(at = $crate::location!(), $cond, $($arg)+)
    };
}

/// Declares and pushes a context at the invocation site, returning its guard.
///
/// Recognised fields are `name`, `level`, `formatter`, and `sinks[<level>]`.
/// Assertions are switched only process-wide, through
/// [`LogConfig::disable_asserts`](crate::LogConfig::disable_asserts).
/// Bind the guard to a named variable; `let _ = scoped_log!(..)` pops the
/// context again immediately.
///
/// ```
/// use logging::{Level, ring_buffer_sink, scoped_log};
///
/// let memory = ring_buffer_sink(512);
/// {
///     let _log = scoped_log!(
///         name = "db",
///         level = Level::Trace,
///         sinks[Level::Info] = memory.clone(),
///     );
///     logging::info_log!("opened");
/// }
/// assert!(memory.lines()[0].ends_with("[db:info]: opened"));
/// ```
#[macro_export]
macro_rules! scoped_log {
    ($($field:ident $([$level:expr])? = $value:expr),* $(,)?) => {{
        let location = $crate::location!();
        let builder = $crate::Context::builder().declared_at(location);
        $(
            let builder = $crate::__scoped_log_field!(builder, $field $([$level])? = $value);
        )*
        $crate::push(builder, location)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __scoped_log_field {
    ($builder:ident, name = $value:expr) => {
        $builder.name($value)
    };
    ($builder:ident, level = $value:expr) => {
        $builder.level($value)
    };
    ($builder:ident, formatter = $value:expr) => {
        $builder.formatter($value)
    };
    ($builder:ident, sinks [$level:expr] = $value:expr) => {
        $builder.sink($level, $value)
    };
}
