pub mod cache;
pub mod synthetic;
pub mod yahoo;

pub use cache::{AnalysisCache, CacheKey};
pub use synthetic::synthetic_series;
pub use yahoo::YahooClient;

use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::PricePoint;

// ---------------------------------------------------------------------------
// History period
// ---------------------------------------------------------------------------

/// How much daily history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryPeriod {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
}

impl HistoryPeriod {
    /// Yahoo `range` parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
        }
    }

    /// Approximate number of trading days in the period.
    pub fn business_days(self) -> usize {
        match self {
            Self::OneMonth => 22,
            Self::ThreeMonths => 66,
            Self::SixMonths => 130,
            Self::OneYear => 260,
            Self::TwoYears => 520,
        }
    }
}

impl std::fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            other => anyhow::bail!("unsupported period '{other}' (expected 1mo, 3mo, 6mo, 1y or 2y)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Series resolution (live data or synthetic fallback)
// ---------------------------------------------------------------------------

/// A price series plus whether it is synthetic.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    pub points: Vec<PricePoint>,
    pub is_demo: bool,
}

/// Pick the series to analyse from the outcome of a live fetch.
///
/// * A non-empty fetch is used as-is.
/// * A failed or empty fetch is replaced by [`synthetic_series`] ending at
///   `today` when `allow_fallback` is set; otherwise the error is returned.
pub fn resolve_series(
    fetched: Result<Vec<PricePoint>>,
    symbol: &str,
    period: HistoryPeriod,
    allow_fallback: bool,
    today: NaiveDate,
) -> Result<MarketData> {
    let err = match fetched {
        Ok(points) if !points.is_empty() => {
            return Ok(MarketData {
                points,
                is_demo: false,
            })
        }
        Ok(_) => anyhow::anyhow!("no price data returned for {symbol}"),
        Err(e) => e,
    };

    if !allow_fallback {
        return Err(err.context(format!("market data unavailable for {symbol}")));
    }

    warn!(symbol, error = %err, "live data unavailable — using synthetic demo series");
    Ok(MarketData {
        points: synthetic_series(symbol, period, today),
        is_demo: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn one_point() -> PricePoint {
        PricePoint {
            date: today(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1,
        }
    }

    #[test]
    fn period_parse_and_display() {
        for p in [
            HistoryPeriod::OneMonth,
            HistoryPeriod::ThreeMonths,
            HistoryPeriod::SixMonths,
            HistoryPeriod::OneYear,
            HistoryPeriod::TwoYears,
        ] {
            assert_eq!(p.to_string().parse::<HistoryPeriod>().unwrap(), p);
            assert_eq!(serde_json::to_string(&p).unwrap(), format!("\"{p}\""));
        }
        assert!("5y".parse::<HistoryPeriod>().is_err());
        assert_eq!(HistoryPeriod::default().business_days(), 260);
    }

    #[test]
    fn live_data_is_used_when_present() {
        let md = resolve_series(Ok(vec![one_point()]), "AAPL", HistoryPeriod::OneYear, true, today()).unwrap();
        assert!(!md.is_demo);
        assert_eq!(md.points.len(), 1);
    }

    #[test]
    fn failure_falls_back_to_synthetic() {
        let md = resolve_series(
            Err(anyhow::anyhow!("connection refused")),
            "AAPL",
            HistoryPeriod::OneYear,
            true,
            today(),
        )
        .unwrap();
        assert!(md.is_demo);
        assert_eq!(md.points.len(), 260);
        assert_eq!(md.points, synthetic_series("AAPL", HistoryPeriod::OneYear, today()));
    }

    #[test]
    fn empty_fetch_falls_back_too() {
        let md = resolve_series(Ok(Vec::new()), "AAPL", HistoryPeriod::OneMonth, true, today()).unwrap();
        assert!(md.is_demo);
        assert_eq!(md.points.len(), 22);
    }

    #[test]
    fn failure_without_fallback_is_error() {
        let res = resolve_series(
            Err(anyhow::anyhow!("timeout")),
            "AAPL",
            HistoryPeriod::OneYear,
            false,
            today(),
        );
        let msg = format!("{:#}", res.unwrap_err());
        assert!(msg.contains("AAPL"));
        assert!(msg.contains("timeout"));
    }
}
