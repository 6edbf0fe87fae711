//! crates/logging/src/config.rs
//! Process-wide defaults, initialised once.
//!
//! The global configuration supplies the minimum level, formatter, and per-level
//! sinks that contexts fall back to. It is written exactly once, either by an
//! explicit [`init`] or lazily with [`LogConfig::default`] on first use, and is
//! read-only afterwards. Later [`init`] calls are ignored.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::format::{DefaultFormatter, Formatter};
use crate::level::{Level, ParseLevelError};
use crate::sink::{SharedSink, SinkTable, stderr_sink, stdout_sink};

/// Environment variable holding the global minimum level.
pub const LEVEL_ENV: &str = "SCOPELOG_LEVEL";

/// Environment variable that disables assertion evaluation when truthy.
pub const DISABLE_ASSERTS_ENV: &str = "SCOPELOG_DISABLE_ASSERTS";

/// Level used when the configuration leaves it at [`Level::Default`].
pub const DEFAULT_LEVEL: Level = Level::Info;

static GLOBAL: OnceLock<GlobalConfig> = OnceLock::new();

/// Errors produced while reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A level variable did not name a level.
    #[error("invalid {var} value '{value}': {source}")]
    InvalidLevel {
        /// Variable that was read.
        var: &'static str,
        /// Rejected value.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: ParseLevelError,
    },
    /// A boolean variable held something other than a recognised flag.
    #[error("invalid {var} value '{value}' (expected 1/0, true/false, yes/no, or on/off)")]
    InvalidFlag {
        /// Variable that was read.
        var: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Builder for the global configuration.
///
/// Every field is optional. Unset fields resolve to level [`Level::Info`], the
/// [`DefaultFormatter`], standard output for trace, debug, and info records,
/// standard error for warn, error, and panic records, and enabled assertions.
///
/// # Examples
///
/// ```
/// use logging::{Level, LogConfig, ring_buffer_sink};
///
/// let errors = ring_buffer_sink(4096);
/// let config = LogConfig::new()
///     .level(Level::Debug)
///     .sink(Level::Error, errors)
///     .disable_asserts(true);
/// assert_eq!(config.configured_level(), Level::Debug);
/// ```
#[derive(Clone, Default)]
pub struct LogConfig {
    level: Level,
    formatter: Option<Arc<dyn Formatter>>,
    sinks: SinkTable,
    disable_asserts: bool,
}

impl LogConfig {
    /// Creates a configuration with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the global minimum level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the global formatter.
    pub fn formatter<F>(self, formatter: F) -> Self
    where
        F: Formatter + 'static,
    {
        self.shared_formatter(Arc::new(formatter))
    }

    /// Sets the global formatter from an existing handle.
    pub fn shared_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Sets the default sink for one level.
    pub fn sink(mut self, level: Level, sink: SharedSink) -> Self {
        self.sinks.set(level, sink);
        self
    }

    /// Turns assertion evaluation off process-wide.
    pub fn disable_asserts(mut self, disable: bool) -> Self {
        self.disable_asserts = disable;
        self
    }

    /// The level as configured, possibly [`Level::Default`].
    #[must_use]
    pub const fn configured_level(&self) -> Level {
        self.level
    }

    /// Reads [`LEVEL_ENV`] and [`DISABLE_ASSERTS_ENV`] from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new().overlay_env(|var| std::env::var(var).ok())
    }

    /// Applies environment-style overrides from `lookup` on top of `self`.
    ///
    /// Missing or empty variables leave the corresponding field untouched.
    pub fn overlay_env<L>(mut self, lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.level = value.parse().map_err(|source| ConfigError::InvalidLevel {
                var: LEVEL_ENV,
                value: value.clone(),
                source,
            })?;
        }

        if let Some(value) = lookup(DISABLE_ASSERTS_ENV).filter(|v| !v.trim().is_empty()) {
            self.disable_asserts = parse_flag(&value).ok_or_else(|| ConfigError::InvalidFlag {
                var: DISABLE_ASSERTS_ENV,
                value: value.clone(),
            })?;
        }

        Ok(self)
    }

    fn resolve(self) -> GlobalConfig {
        let mut sinks = SinkTable::new();
        for level in Level::ALL {
            let fallback = match level {
                Level::Default => continue,
                Level::Trace | Level::Debug | Level::Info => stdout_sink(),
                Level::Warn | Level::Error | Level::Panic => stderr_sink(),
            };
            let sink = self.sinks.get(level).cloned().unwrap_or(fallback);
            sinks.set(level, sink);
        }

        GlobalConfig {
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::new(DefaultFormatter)),
            level: self.level.resolve(DEFAULT_LEVEL),
            sinks,
            asserts_enabled: !self.disable_asserts,
        }
    }
}

impl fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogConfig")
            .field("level", &self.level)
            .field("formatter", &self.formatter.as_ref().map(|_| "custom"))
            .field("sinks", &self.sinks)
            .field("disable_asserts", &self.disable_asserts)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// The resolved, immutable global configuration.
pub struct GlobalConfig {
    formatter: Arc<dyn Formatter>,
    level: Level,
    sinks: SinkTable,
    asserts_enabled: bool,
}

impl GlobalConfig {
    /// Global minimum level; never [`Level::Default`].
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Global formatter.
    #[must_use]
    pub fn formatter(&self) -> &Arc<dyn Formatter> {
        &self.formatter
    }

    /// Default sink for `level`. Only [`Level::Default`] has none.
    #[must_use]
    pub fn sink(&self, level: Level) -> Option<&SharedSink> {
        self.sinks.get(level)
    }

    /// Whether assertions are evaluated.
    #[must_use]
    pub const fn asserts_enabled(&self) -> bool {
        self.asserts_enabled
    }
}

impl fmt::Debug for GlobalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalConfig")
            .field("level", &self.level)
            .field("sinks", &self.sinks)
            .field("asserts_enabled", &self.asserts_enabled)
            .finish_non_exhaustive()
    }
}

/// Installs `config` as the global configuration.
///
/// Returns `true` when this call performed the initialisation. Once the global
/// configuration exists, from an earlier call or from lazy initialisation, the
/// argument is dropped and `false` is returned. Concurrent first calls are
/// safe; exactly one of them wins.
pub fn init(config: LogConfig) -> bool {
    let mut applied = false;
    GLOBAL.get_or_init(|| {
        applied = true;
        config.resolve()
    });
    applied
}

/// The global configuration, initialising it with defaults if necessary.
pub fn global() -> &'static GlobalConfig {
    GLOBAL.get_or_init(|| LogConfig::default().resolve())
}

/// Reports whether the global configuration has been written.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Global minimum level.
pub fn global_level() -> Level {
    global().level()
}

/// Whether assertions are evaluated.
pub fn asserts_enabled() -> bool {
    global().asserts_enabled()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NullSink;

    #[test]
    fn unset_fields_resolve_to_documented_defaults() {
        let resolved = LogConfig::new().resolve();

        assert_eq!(resolved.level(), Level::Info);
        assert!(resolved.asserts_enabled());
        assert!(resolved.sink(Level::Default).is_none());
        for level in [Level::Trace, Level::Debug, Level::Info] {
            assert!(Arc::ptr_eq(resolved.sink(level).unwrap(), &stdout_sink()));
        }
        for level in [Level::Warn, Level::Error, Level::Panic] {
            assert!(Arc::ptr_eq(resolved.sink(level).unwrap(), &stderr_sink()));
        }
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let custom: SharedSink = Arc::new(NullSink);
        let resolved = LogConfig::new()
            .level(Level::Warn)
            .sink(Level::Error, Arc::clone(&custom))
            .disable_asserts(true)
            .resolve();

        assert_eq!(resolved.level(), Level::Warn);
        assert!(!resolved.asserts_enabled());
        assert!(Arc::ptr_eq(resolved.sink(Level::Error).unwrap(), &custom));
        assert!(Arc::ptr_eq(resolved.sink(Level::Warn).unwrap(), &stderr_sink()));
    }

    #[test]
    fn overlay_reads_level_and_flag() {
        let config = LogConfig::new()
            .overlay_env(|var| match var {
                LEVEL_ENV => Some("debug".to_owned()),
                DISABLE_ASSERTS_ENV => Some("Yes".to_owned()),
                _ => None,
            })
            .expect("valid overlay");

        assert_eq!(config.configured_level(), Level::Debug);
        assert!(config.disable_asserts);
    }

    #[test]
    fn overlay_ignores_missing_and_blank_values() {
        let config = LogConfig::new()
            .level(Level::Error)
            .overlay_env(|var| (var == LEVEL_ENV).then(|| "  ".to_owned()))
            .expect("blank values are skipped");
        assert_eq!(config.configured_level(), Level::Error);
        assert!(!config.disable_asserts);
    }

    #[test]
    fn overlay_rejects_bad_level() {
        let err = LogConfig::new()
            .overlay_env(|var| (var == LEVEL_ENV).then(|| "loud".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel { var: LEVEL_ENV, .. }));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn overlay_rejects_bad_flag() {
        let err = LogConfig::new()
            .overlay_env(|var| (var == DISABLE_ASSERTS_ENV).then(|| "maybe".to_owned()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidFlag {
                var: DISABLE_ASSERTS_ENV,
                value: "maybe".to_owned(),
            }
        );
    }

    #[test]
    fn lazy_global_matches_defaults() {
        // Unit tests never install a non-default configuration, so whichever
        // test touches the global first leaves it at the defaults.
        let global = global();
        assert!(is_initialized());
        assert_eq!(global.level(), DEFAULT_LEVEL);
        assert!(global.asserts_enabled());
        assert!(!init(LogConfig::new().level(Level::Panic)));
        assert_eq!(global_level(), DEFAULT_LEVEL);
    }
}
