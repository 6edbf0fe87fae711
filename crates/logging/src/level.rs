//! crates/logging/src/level.rs
//! Severity levels and their textual names.

use std::fmt;
use std::str::FromStr;

/// Severity of a log record, ordered from least to most severe.
///
/// [`Level::Default`] is a sentinel meaning "inherit". Contexts declared with
/// it pick up the global minimum level when they are pushed, so it never acts
/// as a filtering threshold once resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Level {
    /// Use the level configured globally.
    #[default]
    Default = 0,
    /// Tracing execution through the call graph.
    Trace,
    /// Details useful while debugging.
    Debug,
    /// General information.
    Info,
    /// Potential errors or problems.
    Warn,
    /// Actual errors that need fixing.
    Error,
    /// Non-recoverable errors; emitting one terminates the process.
    Panic,
}

impl Level {
    /// Number of levels, including [`Level::Default`].
    pub const COUNT: usize = 7;

    /// Every level in ascending order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Default,
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Panic,
    ];

    /// Position of the level inside per-level tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used in record headers.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::Level;
    ///
    /// assert_eq!(Level::Warn.name(), "warn");
    /// assert_eq!(Level::Default.name(), "default");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Panic => "panic",
        }
    }

    /// Returns `fallback` when `self` is [`Level::Default`], otherwise `self`.
    #[must_use]
    pub const fn resolve(self, fallback: Self) -> Self {
        match self {
            Self::Default => fallback,
            level => level,
        }
    }

    /// Reports whether a record at `self` passes a context whose minimum is `minimum`.
    #[must_use]
    pub fn passes(self, minimum: Self) -> bool {
        self >= minimum
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Error returned when a string does not name a [`Level`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{token}' (expected one of default, trace, debug, info, warn, error, panic)")]
pub struct ParseLevelError {
    token: String,
}

impl ParseLevelError {
    /// The rejected input.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseLevelError {
                token: token.to_owned(),
            })
    }
}
