//! Shared fixtures for cache integration tests.

use std::sync::{Mutex, Once};

use stratagem_cache::{CacheStore, MemoryStorage};
use stratagem_core::config::CacheConfig;
use stratagem_core::types::{
    BusinessContext, MarketingStrategy, PricingStrategy, StructuredStrategy, Tactic,
};

/// An empty in-memory store with default settings.
pub fn memory_store() -> CacheStore<MemoryStorage> {
    CacheStore::open(MemoryStorage::new(), &CacheConfig::default())
        .expect("opening an empty memory store cannot fail")
}

/// A small but complete strategy.
pub fn sample_strategy(id: &str) -> StructuredStrategy {
    let mut strategy = StructuredStrategy::new(
        id,
        BusinessContext::new("Meal kits", "Busy families", "Dinner in 15 minutes"),
    );
    strategy.marketing_strategies.push(MarketingStrategy {
        title: "Instagram Launch".to_string(),
        channel: "social".to_string(),
        description: "Short recipe videos".to_string(),
        tactics: vec![Tactic::new("Reels", "Three per week")],
        ..MarketingStrategy::default()
    });
    strategy.pricing_strategies.push(PricingStrategy {
        title: "Weekly Box".to_string(),
        model: "subscription".to_string(),
        market_fit_score: 8,
        ..PricingStrategy::default()
    });
    strategy
}

/// Current time in epoch milliseconds, as snapshots store it.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// Log capture
// ============================================================================

/// Records every log line as `LEVEL message`.
struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl log::Log for RecordingLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let line = format!("{} {}", record.level(), record.args());
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
    }

    fn flush(&self) {}
}

static LOGGER: RecordingLogger = RecordingLogger {
    lines: Mutex::new(Vec::new()),
};
static LOGGER_INIT: Once = Once::new();

/// Install the recording logger for this test binary.
pub fn capture_logs() {
    LOGGER_INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
}

/// Whether any recorded line at `level` contains `needle`.
///
/// Tests share one logger, so callers should look for text unique to them.
pub fn logged(level: log::Level, needle: &str) -> bool {
    let prefix = format!("{level} ");
    LOGGER
        .lines
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .iter()
        .any(|line| line.starts_with(&prefix) && line.contains(needle))
}
