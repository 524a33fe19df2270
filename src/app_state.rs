// =============================================================================
// Central Application State — Finance Agent
// =============================================================================
//
// Ties the data source, the memo cache and the configuration together and
// runs the single-symbol pipeline:
//
//   cache lookup => live fetch => fallback resolution
//                => compute_indicators => decide => cache insert
//
// Thread safety:
//   - parking_lot::RwLock around the runtime configuration.
//   - The cache manages its own interior mutability.
//   - Indicator and decision computation is pure; concurrent analyses share
//     nothing but the cache.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use futures_util::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis_result::AnalysisReport;
use crate::decision_engine::decide;
use crate::indicator_engine::compute_indicators;
use crate::market_data::{resolve_series, AnalysisCache, CacheKey, HistoryPeriod, YahooClient};
use crate::runtime_config::RuntimeConfig;
use crate::types::{Decision, RiskLevel, Stance};

// =============================================================================
// Scan rows
// =============================================================================

/// One line of a multi-symbol scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRow {
    pub symbol: String,
    pub decision: Decision,
    pub stance: Stance,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub volatility: f64,
    pub is_demo: bool,
}

impl From<&AnalysisReport> for ScanRow {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            symbol: report.symbol.clone(),
            decision: report.analysis.decision,
            stance: report.analysis.decision.stance(),
            risk_level: report.analysis.risk_level,
            confidence: (report.analysis.confidence * 10.0).round() / 10.0,
            volatility: (report.analysis.volatility * 100.0).round() / 100.0,
            is_demo: report.is_demo,
        }
    }
}

// =============================================================================
// AppState
// =============================================================================

/// Shared state for the HTTP API and the one-shot workflow.
pub struct AppState {
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub yahoo: YahooClient,
    pub cache: AnalysisCache,
    /// Instant when the agent was started. Used for uptime reporting.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct a new `AppState` from the given runtime configuration and
    /// data client.
    pub fn new(config: RuntimeConfig, yahoo: YahooClient) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self {
            runtime_config: Arc::new(RwLock::new(config)),
            yahoo,
            cache: AnalysisCache::new(ttl),
            start_time: std::time::Instant::now(),
        }
    }

    /// Analyse a single symbol, serving from the cache when possible.
    ///
    /// Fails only when live data is unavailable and `allow_fallback` is off.
    pub async fn analyze(
        &self,
        symbol: &str,
        period: HistoryPeriod,
        allow_fallback: bool,
    ) -> Result<AnalysisReport> {
        let symbol = symbol.trim().to_uppercase();
        let analysis_config = self.runtime_config.read().analysis.clone();
        let key = CacheKey::new(&symbol, period, allow_fallback, &analysis_config);

        if let Some(report) = self.cache.get(&key) {
            debug!(key = %key, "analysis served from cache");
            return Ok(report);
        }

        let fetched = self.yahoo.fetch_daily(&symbol, period).await;
        let market = resolve_series(fetched, &symbol, period, allow_fallback, Utc::now().date_naive())?;

        let (frame, volatility) = compute_indicators(&market.points, &analysis_config);
        let analysis = decide(&frame, volatility);

        info!(
            symbol = %symbol,
            period = %period,
            demo = market.is_demo,
            decision = %analysis.decision,
            confidence = analysis.confidence,
            "analysis complete"
        );

        let report = AnalysisReport {
            symbol,
            period,
            is_demo: market.is_demo,
            observations: frame.len(),
            generated_at: Utc::now(),
            analysis,
        };

        self.cache.insert(key, report.clone());
        Ok(report)
    }

    /// Analyse up to `limit` of `symbols` concurrently.
    ///
    /// Symbols whose data cannot be resolved are skipped. Rows are ordered by
    /// confidence (descending), then volatility (ascending).
    pub async fn scan(
        &self,
        symbols: &[String],
        limit: usize,
        period: HistoryPeriod,
        allow_fallback: bool,
    ) -> Vec<ScanRow> {
        let subset = &symbols[..limit.min(symbols.len())];

        let outcomes = join_all(
            subset
                .iter()
                .map(|s| self.analyze(s, period, allow_fallback)),
        )
        .await;

        let mut rows: Vec<ScanRow> = subset
            .iter()
            .zip(outcomes)
            .filter_map(|(symbol, outcome)| match outcome {
                Ok(report) => Some(ScanRow::from(&report)),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "scan: symbol skipped");
                    None
                }
            })
            .collect();

        sort_scan_rows(&mut rows);
        info!(requested = subset.len(), analysed = rows.len(), "scan complete");
        rows
    }
}

fn sort_scan_rows(rows: &mut [ScanRow]) {
    rows.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then(a.volatility.total_cmp(&b.volatility))
    });
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Nothing listens on the discard port, so every fetch fails fast and the
    /// fallback path is exercised.
    fn offline_state() -> AppState {
        let client = YahooClient::with_base_url("http://127.0.0.1:9").unwrap();
        AppState::new(RuntimeConfig::default(), client)
    }

    fn row(symbol: &str, confidence: f64, volatility: f64) -> ScanRow {
        ScanRow {
            symbol: symbol.to_string(),
            decision: Decision::HoldWatch,
            stance: Stance::Neutral,
            risk_level: RiskLevel::Low,
            confidence,
            volatility,
            is_demo: false,
        }
    }

    #[test]
    fn scan_rows_sorted_by_confidence_then_volatility() {
        let mut rows = vec![row("A", 50.0, 10.0), row("B", 80.0, 30.0), row("C", 80.0, 12.0)];
        sort_scan_rows(&mut rows);
        let order: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn offline_analysis_uses_demo_series() {
        let state = offline_state();
        let report = state.analyze("btc-usd", HistoryPeriod::OneYear, true).await.unwrap();
        assert_eq!(report.symbol, "BTC-USD");
        assert!(report.is_demo);
        assert_eq!(report.observations, 260);
        assert_ne!(report.analysis.decision, Decision::InsufficientData);
        assert!((30.0..=95.0).contains(&report.analysis.confidence));
        assert_eq!(state.cache.len(), 1);
    }

    #[tokio::test]
    async fn short_period_yields_sentinel() {
        let state = offline_state();
        let report = state.analyze("AAPL", HistoryPeriod::OneMonth, true).await.unwrap();
        assert_eq!(report.observations, 22);
        assert_eq!(report.analysis.decision, Decision::InsufficientData);
    }

    #[tokio::test]
    async fn offline_without_fallback_fails() {
        let state = offline_state();
        assert!(state.analyze("AAPL", HistoryPeriod::OneYear, false).await.is_err());
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn repeated_analysis_is_cached() {
        let state = offline_state();
        let first = state.analyze("GC=F", HistoryPeriod::SixMonths, true).await.unwrap();
        let second = state.analyze("GC=F", HistoryPeriod::SixMonths, true).await.unwrap();
        assert_eq!(first.generated_at, second.generated_at);
        assert_eq!(first.analysis, second.analysis);
    }

    #[tokio::test]
    async fn scan_respects_limit() {
        let state = offline_state();
        let symbols: Vec<String> = ["AAA", "BBB", "CCC", "DDD"].iter().map(|s| s.to_string()).collect();
        let rows = state.scan(&symbols, 3, HistoryPeriod::OneYear, true).await;
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.is_demo));
        for w in rows.windows(2) {
            assert!(w[0].confidence >= w[1].confidence);
        }
    }
}
