// =============================================================================
// Indicator Engine — OHLCV series => indicator frame + volatility
// =============================================================================
//
// Pipeline:
//   1. Drop rows with a missing (non-finite) open/high/low/close.
//   2. Build every indicator column from the close prices.
//   3. Zip the columns back onto the surviving rows.
//   4. Compute annualised volatility over all returns.
//
// The caller's series is only read; the frame owns copies of the rows.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::indicators::bollinger::calculate_bollinger;
use crate::indicators::macd::calculate_macd;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::indicators::volatility::{annualized_volatility, calculate_returns};
use crate::runtime_config::AnalysisConfig;
use crate::types::PricePoint;

/// One price bar plus every derived indicator for that bar.
///
/// `None` marks a value without enough history. `rsi` is always present
/// (neutral 50 during warm-up).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub point: PricePoint,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: f64,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_mid: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    /// Fractional change from the previous close.
    pub returns: Option<f64>,
}

/// The augmented series produced by [`compute_indicators`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorFrame {
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&IndicatorRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

/// Compute the indicator frame and annualised volatility (percent) for
/// `series`.
///
/// Never fails: columns are simply `None` until their window fills, and a
/// degenerate return series yields a volatility of 0.0.
pub fn compute_indicators(series: &[PricePoint], config: &AnalysisConfig) -> (IndicatorFrame, f64) {
    let points: Vec<&PricePoint> = series.iter().filter(|p| p.is_complete()).collect();
    let dropped = series.len() - points.len();

    let closes: Vec<f64> = points.iter().map(|p| p.close).collect();

    let sma_short = calculate_sma(&closes, config.short_sma);
    let sma_long = calculate_sma(&closes, config.long_sma);
    let rsi = calculate_rsi(&closes, config.rsi_period);
    let macd = calculate_macd(&closes, config.ema_fast, config.ema_slow, config.ema_signal);
    let bands = calculate_bollinger(&closes, config.bb_period, config.bb_std);
    let returns = calculate_returns(&closes);

    let volatility = annualized_volatility(&returns);

    let rows = points
        .into_iter()
        .enumerate()
        .map(|(i, point)| {
            let m = macd.get(i);
            let bb = bands[i];
            IndicatorRow {
                point: point.clone(),
                sma_short: sma_short[i],
                sma_long: sma_long[i],
                rsi: rsi[i],
                macd: m.map(|m| m.macd),
                macd_signal: m.map(|m| m.signal),
                macd_hist: m.map(|m| m.histogram),
                bb_mid: bb.map(|b| b.middle),
                bb_upper: bb.map(|b| b.upper),
                bb_lower: bb.map(|b| b.lower),
                returns: returns[i],
            }
        })
        .collect::<Vec<_>>();

    debug!(
        rows = rows.len(),
        dropped,
        volatility = format!("{:.3}", volatility),
        "indicator frame computed"
    );

    (IndicatorFrame { rows }, volatility)
}
