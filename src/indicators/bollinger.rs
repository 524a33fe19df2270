// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the rolling *sample* standard
// deviation (n - 1 denominator) of the closes in the window.

use super::sma::window_mean;

/// Bollinger Bands for a single row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate the Bollinger Band column for the given closing prices.
///
/// The output is aligned with the input. Row `i` is `Some` once a full
/// window of `period` closes ending at `i` exists.
///
/// Returns all `None` when:
/// - `period < 2` (the sample deviation needs two points).
/// - Fewer than `period` data points.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Vec<Option<BollingerBand>> {
    let mut result = vec![None; closes.len()];
    if period < 2 || closes.len() < period {
        return result;
    }

    for (offset, window) in closes.windows(period).enumerate() {
        let middle = window_mean(window);
        let variance =
            window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / (period - 1) as f64;
        let std_dev = variance.sqrt();

        if middle.is_finite() && std_dev.is_finite() {
            result[offset + period - 1] = Some(BollingerBand {
                upper: middle + num_std * std_dev,
                middle,
                lower: middle - num_std * std_dev,
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bands = calculate_bollinger(&closes, 20, 2.0);
        assert!(bands[18].is_none());
        let bb = bands[19].unwrap();
        assert!((bb.middle - 10.5).abs() < 1e-10);
        // sample std of 1..=20 = sqrt(35)
        let expected_std = 35.0_f64.sqrt();
        assert!((bb.upper - (10.5 + 2.0 * expected_std)).abs() < 1e-10);
        assert!((bb.lower - (10.5 - 2.0 * expected_std)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(calculate_bollinger(&closes, 20, 2.0).iter().all(Option::is_none));
    }

    #[test]
    fn bollinger_degenerate_period() {
        assert!(calculate_bollinger(&[1.0, 2.0, 3.0], 1, 2.0).iter().all(Option::is_none));
    }

    #[test]
    fn bollinger_flat() {
        let closes = vec![100.0; 20];
        let bb = calculate_bollinger(&closes, 20, 2.0)[19].unwrap();
        assert_eq!(bb.upper, 100.0);
        assert_eq!(bb.middle, 100.0);
        assert_eq!(bb.lower, 100.0);
    }
}
