// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean of the trailing `window` closes. No partial windows: the
// first `window - 1` rows are undefined.
// =============================================================================

/// Compute the SMA column for `values`.
///
/// The output is aligned with the input (same length). Index `i` holds the
/// mean of `values[i + 1 - window..=i]`, or `None` while fewer than `window`
/// rows are available.
///
/// # Edge cases
/// - `window == 0` => every row is `None`
/// - `values.len() < window` => every row is `None`
pub fn calculate_sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    for (offset, w) in values.windows(window).enumerate() {
        let mean = window_mean(w);
        if mean.is_finite() {
            result[offset + window - 1] = Some(mean);
        }
    }

    result
}

/// Mean of a non-empty window.
///
/// Accumulated relative to the first element so a flat window averages to
/// exactly that value.
pub(crate) fn window_mean(w: &[f64]) -> f64 {
    let anchor = w[0];
    anchor + w.iter().map(|x| x - anchor).sum::<f64>() / w.len() as f64
}
