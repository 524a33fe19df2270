// =============================================================================
// Yahoo Finance Chart API Client — daily OHLCV history
// =============================================================================
//
// Public endpoint, no authentication. Yahoo rejects requests without a
// browser-like User-Agent, so one is installed as a default header.
// =============================================================================

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::HistoryPeriod;
use crate::types::PricePoint;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Yahoo Finance REST client.
#[derive(Debug, Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Client against the public Yahoo endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternative host (proxies, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    // -------------------------------------------------------------------------
    // Market data
    // -------------------------------------------------------------------------

    /// GET /v8/finance/chart/{symbol}?range={period}&interval=1d
    ///
    /// Returns complete daily bars, ascending and unique by date.
    #[instrument(skip(self), name = "yahoo::fetch_daily")]
    pub async fn fetch_daily(&self, symbol: &str, period: HistoryPeriod) -> Result<Vec<PricePoint>> {
        let url = self.chart_url(symbol, period)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read chart response body")?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ChartEnvelope>(&body)
                .ok()
                .and_then(|env| env.chart.error)
                .map(|e| format!("{}: {}", e.code, e.description))
                .unwrap_or(body);
            anyhow::bail!("Yahoo GET /v8/finance/chart/{symbol} returned {status}: {detail}");
        }

        let points = parse_chart(&body)?;
        debug!(symbol, period = %period, count = points.len(), "daily bars fetched");
        Ok(points)
    }

    fn chart_url(&self, symbol: &str, period: HistoryPeriod) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base url {}", self.base_url))?;

        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url {} cannot hold a path", self.base_url))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);

        url.query_pairs_mut()
            .append_pair("range", period.as_str())
            .append_pair("interval", "1d");

        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Response model
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC, in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Parse a chart response body into daily bars.
///
/// Rows with any null price are skipped and null volume becomes 0. Dates are
/// taken in exchange-local time; a repeated date keeps the later row.
fn parse_chart(body: &str) -> Result<Vec<PricePoint>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = envelope.chart.error {
        anyhow::bail!("Yahoo chart error {}: {}", err.code, err.description);
    }

    let data = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .context("chart response has no result")?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .context("chart response has no quote block")?;

    let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    let mut by_date: BTreeMap<NaiveDate, PricePoint> = BTreeMap::new();
    for (i, &ts) in data.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) else {
            continue;
        };

        let Some(local) = DateTime::from_timestamp(ts + data.meta.gmtoffset, 0) else {
            continue;
        };
        let date = local.date_naive();

        by_date.insert(
            date,
            PricePoint {
                date,
                open,
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            },
        );
    }

    Ok(by_date.into_values().collect())
}
