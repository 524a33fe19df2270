// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula (recursive, span form):
//   alpha = 2 / (span + 1)
//   EMA_0 = value_0
//   EMA_t = EMA_{t-1} + alpha * (value_t - EMA_{t-1})
//
// Seeded with the first observation, so the series is defined from row 0 with
// no warm-up gap.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// The output has the same length as the input.
///
/// # Edge cases
/// - `span == 0` => empty vec
/// - empty input => empty vec
/// - A non-finite input value leaves the previous EMA unchanged for that row.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    let mut prev = values[0];
    result.push(prev);

    for &value in &values[1..] {
        if value.is_finite() {
            prev += alpha * (value - prev);
        }
        result.push(prev);
    }

    result
}
