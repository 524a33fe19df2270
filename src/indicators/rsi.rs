// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split into gain = max(delta, 0) and loss = max(-delta, 0).
// Step 3 — Smooth both with an EMA of alpha = 1 / period, seeded with the first
//          delta and only reported once `period` deltas have been observed:
//            avg_t = avg_{t-1} + (x_t - avg_{t-1}) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Neutral default: before the averages are reported, and whenever the average
// loss is zero, RSI is 50.0. The column therefore never has gaps.
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

/// Value reported wherever RSI cannot be computed.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the RSI column for `closes` with look-back `period`.
///
/// The output is aligned with the input. Row `i` is a real RSI reading once
/// `i >= period` (row 0 has no delta); every other row is [`NEUTRAL_RSI`].
///
/// # Edge cases
/// - `period == 0` => every row is neutral
/// - Average loss of zero (flat or only rising window) => neutral, not 100
/// - Non-finite results => neutral
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![NEUTRAL_RSI; closes.len()];
    if period == 0 || closes.len() < 2 {
        return result;
    }

    let period_f = period as f64;
    let mut avg_gain = 0.0_f64;
    let mut avg_loss = 0.0_f64;

    for (i, w) in closes.windows(2).enumerate() {
        let row = i + 1;
        let delta = w[1] - w[0];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if row == 1 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain += (gain - avg_gain) / period_f;
            avg_loss += (loss - avg_loss) / period_f;
        }

        // `row` deltas observed so far.
        if row >= period {
            result[row] = rsi_from_averages(avg_gain, avg_loss);
        }
    }

    result
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Zero average loss leaves RS undefined; that case and any non-finite result
/// fall back to [`NEUTRAL_RSI`].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return NEUTRAL_RSI;
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);

    if rsi.is_finite() {
        rsi.clamp(0.0, 100.0)
    } else {
        NEUTRAL_RSI
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero_is_neutral() {
        let rsi = calculate_rsi(&[1.0, 2.0, 3.0], 0);
        assert_eq!(rsi, vec![50.0, 50.0, 50.0]);
    }

    #[test]
    fn rsi_warm_up_rows_are_neutral() {
        let closes: Vec<f64> = (1..=20).map(|x| if x % 2 == 0 { x as f64 } else { x as f64 * 0.9 }).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 20);
        for &v in &rsi[..14] {
            assert_eq!(v, 50.0);
        }
    }

    #[test]
    fn rsi_all_gains_is_neutral() {
        // No losses => RS undefined => neutral default, never 100.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for &v in &calculate_rsi(&closes, 14) {
            assert!((v - 50.0).abs() < 1e-10, "expected 50.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        for &v in &rsi[14..] {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market() {
        let closes = vec![100.0; 30];
        for &v in &calculate_rsi(&closes, 14) {
            assert_eq!(v, 50.0);
        }
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let rsi = calculate_rsi(&closes, 14);
        for &v in &rsi {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
        // Mixed gains and losses => a real reading at the first reported row.
        assert!(rsi[14] != 50.0);
    }

    #[test]
    fn rsi_wilder_recursion() {
        // period 2: deltas +2, -1, +1
        let closes = vec![10.0, 12.0, 11.0, 12.0];
        let rsi = calculate_rsi(&closes, 2);

        // row 2: avg_gain = 2 + (0 - 2)/2 = 1, avg_loss = 0 + (1 - 0)/2 = 0.5
        let expected_row2 = 100.0 - 100.0 / (1.0 + 1.0 / 0.5);
        assert!((rsi[2] - expected_row2).abs() < 1e-10);

        // row 3: avg_gain = 1 + (1 - 1)/2 = 1, avg_loss = 0.5 + (0 - 0.5)/2 = 0.25
        let expected_row3 = 100.0 - 100.0 / (1.0 + 1.0 / 0.25);
        assert!((rsi[3] - expected_row3).abs() < 1e-10);
    }
}
