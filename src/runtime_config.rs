// =============================================================================
// Runtime Configuration — Agent settings loaded from JSON
// =============================================================================
//
// Central configuration for the Finance Agent. Indicator windows live in
// `AnalysisConfig`, which is cloned into every analysis request and never
// mutated afterwards.
//
// All fields carry `#[serde(default)]` so that adding new fields never breaks
// loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::market_data::HistoryPeriod;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_symbols() -> Vec<String> {
    vec![
        "THYAO.IS".to_string(),
        "BTC-USD".to_string(),
        "^GSPC".to_string(),
        "EURUSD=X".to_string(),
        "GC=F".to_string(),
    ]
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_scan_limit() -> usize {
    8
}

fn default_rsi_period() -> usize {
    14
}

fn default_short_sma() -> usize {
    20
}

fn default_long_sma() -> usize {
    50
}

fn default_ema_fast() -> usize {
    12
}

fn default_ema_slow() -> usize {
    26
}

fn default_ema_signal() -> usize {
    9
}

fn default_bb_period() -> usize {
    20
}

fn default_bb_std() -> f64 {
    2.0
}

/// Bounds applied to any requested scan size.
pub const SCAN_LIMIT_RANGE: (usize, usize) = (3, 20);

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Indicator window sizes. Immutable once built; pass by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// RSI look-back (Wilder smoothing factor 1 / rsi_period).
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Short trend SMA window.
    #[serde(default = "default_short_sma")]
    pub short_sma: usize,

    /// Long trend SMA window.
    #[serde(default = "default_long_sma")]
    pub long_sma: usize,

    /// MACD fast EMA span.
    #[serde(default = "default_ema_fast")]
    pub ema_fast: usize,

    /// MACD slow EMA span.
    #[serde(default = "default_ema_slow")]
    pub ema_slow: usize,

    /// MACD signal-line EMA span.
    #[serde(default = "default_ema_signal")]
    pub ema_signal: usize,

    /// Bollinger window.
    #[serde(default = "default_bb_period")]
    pub bb_period: usize,

    /// Bollinger band width in standard deviations.
    #[serde(default = "default_bb_std")]
    pub bb_std: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            short_sma: default_short_sma(),
            long_sma: default_long_sma(),
            ema_fast: default_ema_fast(),
            ema_slow: default_ema_slow(),
            ema_signal: default_ema_signal(),
            bb_period: default_bb_period(),
            bb_std: default_bb_std(),
        }
    }
}

impl AnalysisConfig {
    /// Stable textual identity of the configuration, used as part of cache
    /// keys (the float field rules out a derived `Hash`).
    pub fn fingerprint(&self) -> String {
        format!(
            "rsi{}:sma{}/{}:macd{}/{}/{}:bb{}x{}",
            self.rsi_period,
            self.short_sma,
            self.long_sma,
            self.ema_fast,
            self.ema_slow,
            self.ema_signal,
            self.bb_period,
            self.bb_std.to_bits()
        )
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the agent.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Watch-list used by category scans.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// History window requested from the data source.
    #[serde(default)]
    pub period: HistoryPeriod,

    /// Substitute a synthetic series when the live fetch fails.
    #[serde(default = "default_true")]
    pub demo_fallback: bool,

    /// Lifetime of memoised analyses, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Default number of symbols analysed per scan.
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,

    /// Indicator windows.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            period: HistoryPeriod::default(),
            demo_fallback: true,
            cache_ttl_secs: default_cache_ttl_secs(),
            scan_limit: default_scan_limit(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            period = %config.period,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Clamp a requested scan size into [`SCAN_LIMIT_RANGE`].
    pub fn clamp_scan_limit(limit: usize) -> usize {
        limit.clamp(SCAN_LIMIT_RANGE.0, SCAN_LIMIT_RANGE.1)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.symbols.len(), 5);
        assert_eq!(cfg.symbols[0], "THYAO.IS");
        assert_eq!(cfg.period, HistoryPeriod::OneYear);
        assert!(cfg.demo_fallback);
        assert_eq!(cfg.cache_ttl_secs, 300);
        assert_eq!(cfg.scan_limit, 8);

        let a = &cfg.analysis;
        assert_eq!(a.rsi_period, 14);
        assert_eq!((a.short_sma, a.long_sma), (20, 50));
        assert_eq!((a.ema_fast, a.ema_slow, a.ema_signal), (12, 26, 9));
        assert_eq!(a.bb_period, 20);
        assert!((a.bb_std - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.demo_fallback);
        assert_eq!(cfg.analysis, AnalysisConfig::default());
        assert_eq!(cfg.period, HistoryPeriod::OneYear);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "period": "6mo", "symbols": ["AAPL"], "analysis": { "rsi_period": 7 } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.period, HistoryPeriod::SixMonths);
        assert_eq!(cfg.symbols, vec!["AAPL"]);
        assert_eq!(cfg.analysis.rsi_period, 7);
        assert_eq!(cfg.analysis.long_sma, 50);
        assert_eq!(cfg.cache_ttl_secs, 300);
    }

    #[test]
    fn fingerprint_tracks_every_field() {
        let base = AnalysisConfig::default();
        let mut other = base.clone();
        assert_eq!(base.fingerprint(), other.fingerprint());
        other.bb_std = 2.5;
        assert_ne!(base.fingerprint(), other.fingerprint());
        let mut other = base.clone();
        other.ema_signal = 10;
        assert_ne!(base.fingerprint(), other.fingerprint());
    }

    #[test]
    fn scan_limit_is_clamped() {
        assert_eq!(RuntimeConfig::clamp_scan_limit(1), 3);
        assert_eq!(RuntimeConfig::clamp_scan_limit(8), 8);
        assert_eq!(RuntimeConfig::clamp_scan_limit(100), 20);
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(RuntimeConfig::load("/nonexistent/agent_config.json").is_err());
    }
}
