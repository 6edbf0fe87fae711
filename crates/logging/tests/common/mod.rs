//! Shared fixtures for integration tests.
//!
//! The global configuration is process-wide and can only be written once, so
//! every test in a binary calls [`setup`] and receives the same per-level
//! in-memory sinks.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use logging::{Level, LogConfig, RingBufferSink};

/// Capacity of each global in-memory sink.
pub const GLOBAL_RING_CAPACITY: usize = 64 * 1024;

/// One in-memory sink per level, installed as the global defaults.
pub struct GlobalRings {
    rings: Vec<Arc<RingBufferSink>>,
}

impl GlobalRings {
    /// The global default sink for `level`.
    pub fn get(&self, level: Level) -> &Arc<RingBufferSink> {
        &self.rings[level.index()]
    }

    /// Reports whether any global sink holds a line containing `needle`.
    pub fn any_contains(&self, needle: &str) -> bool {
        Level::ALL
            .into_iter()
            .any(|level| contains(self.get(level), needle))
    }
}

/// Reports whether `ring` holds a line containing `needle`.
pub fn contains(ring: &RingBufferSink, needle: &str) -> bool {
    ring.lines().iter().any(|line| line.contains(needle))
}

/// Installs the shared global configuration and returns its sinks.
pub fn setup() -> &'static GlobalRings {
    static RINGS: OnceLock<GlobalRings> = OnceLock::new();
    let rings = RINGS.get_or_init(|| GlobalRings {
        rings: Level::ALL
            .into_iter()
            .map(|_| Arc::new(RingBufferSink::with_capacity(GLOBAL_RING_CAPACITY)))
            .collect(),
    });

    let mut config = LogConfig::new().level(Level::Info);
    for level in Level::ALL.into_iter().skip(1) {
        config = config.sink(level, rings.get(level).clone());
    }
    logging::init(config);
    rings
}
