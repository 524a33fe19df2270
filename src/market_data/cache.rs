// ---------------------------------------------------------------------------
// AnalysisCache -- time-boxed memoisation of analysis reports
// ---------------------------------------------------------------------------
//
// Keyed by everything that changes the outcome of an analysis: symbol,
// period, fallback policy and the indicator configuration. Entries older
// than the TTL are treated as absent and dropped on the next purge.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::HistoryPeriod;
use crate::analysis_result::AnalysisReport;
use crate::runtime_config::AnalysisConfig;

/// Composite key that identifies a unique analysis request.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CacheKey {
    pub symbol: String,
    pub period: HistoryPeriod,
    pub allow_fallback: bool,
    pub config: String,
}

impl CacheKey {
    pub fn new(symbol: &str, period: HistoryPeriod, allow_fallback: bool, config: &AnalysisConfig) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            period,
            allow_fallback,
            config: config.fingerprint(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.period)
    }
}

struct Entry {
    report: AnalysisReport,
    stored_at: Instant,
}

/// Thread-safe TTL cache of [`AnalysisReport`]s.
pub struct AnalysisCache {
    entries: RwLock<HashMap<CacheKey, Entry>>,
    ttl: Duration,
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return a clone of the cached report if it is younger than the TTL.
    pub fn get(&self, key: &CacheKey) -> Option<AnalysisReport> {
        let map = self.entries.read();
        map.get(key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.report.clone())
    }

    /// Insert or replace the report for `key`.
    pub fn insert(&self, key: CacheKey, report: AnalysisReport) {
        self.entries.write().insert(
            key,
            Entry {
                report,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry and return how many were removed.
    pub fn clear(&self) -> usize {
        let mut map = self.entries.write();
        let n = map.len();
        map.clear();
        n
    }

    /// Drop expired entries and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut map = self.entries.write();
        let before = map.len();
        map.retain(|_, e| e.stored_at.elapsed() < self.ttl);
        before - map.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_result::AnalysisResult;
    use chrono::Utc;

    fn report(symbol: &str) -> AnalysisReport {
        AnalysisReport {
            symbol: symbol.to_string(),
            period: HistoryPeriod::OneYear,
            is_demo: true,
            observations: 10,
            generated_at: Utc::now(),
            analysis: AnalysisResult::insufficient_data(0.0),
        }
    }

    fn key(symbol: &str) -> CacheKey {
        CacheKey::new(symbol, HistoryPeriod::OneYear, true, &AnalysisConfig::default())
    }

    #[test]
    fn hit_within_ttl() {
        let cache = AnalysisCache::new(Duration::from_secs(300));
        cache.insert(key("aapl"), report("AAPL"));
        let hit = cache.get(&key("AAPL")).unwrap();
        assert_eq!(hit.symbol, "AAPL");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_ttl_never_hits() {
        let cache = AnalysisCache::new(Duration::ZERO);
        cache.insert(key("AAPL"), report("AAPL"));
        assert!(cache.get(&key("AAPL")).is_none());
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn key_includes_config() {
        let cache = AnalysisCache::new(Duration::from_secs(300));
        cache.insert(key("AAPL"), report("AAPL"));

        let cfg = AnalysisConfig {
            rsi_period: 7,
            ..AnalysisConfig::default()
        };
        let other = CacheKey::new("AAPL", HistoryPeriod::OneYear, true, &cfg);
        assert!(cache.get(&other).is_none());

        let no_fallback = CacheKey::new("AAPL", HistoryPeriod::OneYear, false, &AnalysisConfig::default());
        assert!(cache.get(&no_fallback).is_none());
    }

    #[test]
    fn clear_empties() {
        let cache = AnalysisCache::new(Duration::from_secs(300));
        cache.insert(key("A"), report("A"));
        cache.insert(key("B"), report("B"));
        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }
}
