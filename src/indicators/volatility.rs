// =============================================================================
// Returns & Annualised Volatility
// =============================================================================
//
//   return_t   = close_t / close_{t-1} - 1
//   volatility = stdev(returns) * sqrt(252) * 100
//
// The standard deviation is the sample deviation over every available return
// in the series, not a trailing window.
// =============================================================================

/// Trading days per year used for annualisation.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Simple (fractional) return of each close versus the previous one.
///
/// Row 0 is always `None`; so is any row whose previous close is zero.
pub fn calculate_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return result;
    }

    result.push(None);
    for w in closes.windows(2) {
        let prev = w[0];
        if prev == 0.0 {
            result.push(None);
        } else {
            let r = w[1] / prev - 1.0;
            result.push(r.is_finite().then_some(r));
        }
    }
    result
}

/// Annualised volatility in percent.
///
/// Returns 0.0 when fewer than two returns exist or the result is not finite.
/// A flat series yields exactly 0.0.
pub fn annualized_volatility(returns: &[Option<f64>]) -> f64 {
    let values: Vec<f64> = returns.iter().flatten().copied().collect();
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let vol = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;

    if vol.is_finite() {
        vol
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_alignment() {
        let r = calculate_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 3);
        assert!(r[0].is_none());
        assert!((r[1].unwrap() - 0.10).abs() < 1e-12);
        assert!((r[2].unwrap() + 0.10).abs() < 1e-12);
    }

    #[test]
    fn returns_zero_previous_close() {
        let r = calculate_returns(&[0.0, 1.0]);
        assert!(r[1].is_none());
    }

    #[test]
    fn volatility_flat_is_zero() {
        let r = calculate_returns(&vec![42.0; 100]);
        assert_eq!(annualized_volatility(&r), 0.0);
    }

    #[test]
    fn volatility_degenerate_inputs() {
        assert_eq!(annualized_volatility(&[]), 0.0);
        assert_eq!(annualized_volatility(&calculate_returns(&[1.0])), 0.0);
        assert_eq!(annualized_volatility(&calculate_returns(&[1.0, 2.0])), 0.0);
    }

    #[test]
    fn volatility_known_value() {
        // returns: +10%, -10% => sample std = sqrt(0.02) ~ 0.141421
        let r = calculate_returns(&[100.0, 110.0, 99.0]);
        let expected = 0.02_f64.sqrt() * 252.0_f64.sqrt() * 100.0;
        assert!((annualized_volatility(&r) - expected).abs() < 1e-9);
        assert!(annualized_volatility(&r) >= 0.0);
    }
}
