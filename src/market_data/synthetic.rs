// =============================================================================
// Synthetic Demo Series — deterministic fallback when live data is missing
// =============================================================================
//
// A bounded random walk over business days (Mon–Fri) ending at `end`.
// The generator is seeded from the symbol text so the same symbol, period and
// end date always produce the same bars.
// =============================================================================

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::HistoryPeriod;
use crate::types::PricePoint;

/// Per-day drift bound (fraction).
const MAX_DRIFT: f64 = 0.0015;
/// Per-day shock bound (fraction).
const MAX_SHOCK: f64 = 0.022;
/// Intraday wick bound beyond the open/close body (fraction).
const MAX_WICK: f64 = 0.01;

/// Build the synthetic series for `symbol`.
pub fn synthetic_series(symbol: &str, period: HistoryPeriod, end: NaiveDate) -> Vec<PricePoint> {
    let dates = business_days_ending(end, period.business_days());
    let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));

    let drift = rng.random_range(-MAX_DRIFT..=MAX_DRIFT);
    let mut close: f64 = rng.random_range(50.0..500.0);

    dates
        .into_iter()
        .map(|date| {
            let open = close;
            let shock = rng.random_range(-MAX_SHOCK..=MAX_SHOCK);
            close = (open * (1.0 + drift + shock)).max(0.01);

            let body_high = open.max(close);
            let body_low = open.min(close);
            let high = body_high * (1.0 + rng.random_range(0.0..=MAX_WICK));
            let low = body_low * (1.0 - rng.random_range(0.0..=MAX_WICK));

            PricePoint {
                date,
                open,
                high,
                low,
                close,
                volume: rng.random_range(100_000..5_000_000),
            }
        })
        .collect()
}

/// The last `count` weekdays up to and including `end`, oldest first.
fn business_days_ending(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut day = end;
    while dates.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(day);
        }
        match day.checked_sub_days(Days::new(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }
    dates.reverse();
    dates
}

/// FNV-1a over the symbol bytes.
fn symbol_seed(symbol: &str) -> u64 {
    symbol
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, b| {
            (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        })
}
