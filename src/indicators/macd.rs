// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   macd      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(macd, signal_span)
//   histogram = macd - signal
//
// All three lines are defined from the first row because the underlying EMAs
// are seeded with the first observation.
// =============================================================================

use super::ema::calculate_ema;

/// MACD lines for a single row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the MACD column for `closes`.
///
/// Returns one [`MacdPoint`] per close, or an empty vec when any span is zero
/// or the input is empty.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> Vec<MacdPoint> {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);
    if ema_fast.is_empty() || ema_slow.is_empty() {
        return Vec::new();
    }

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = calculate_ema(&macd_line, signal_span);
    if signal_line.is_empty() {
        return Vec::new();
    }

    macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(&macd, &signal)| MacdPoint {
            macd,
            signal,
            histogram: macd - signal,
        })
        .collect()
}
