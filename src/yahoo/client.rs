// =============================================================================
// Yahoo Finance chart client
// =============================================================================
//
// Fetches OHLCV history from the public v8 chart endpoint:
//   GET {base}/v8/finance/chart/{symbol}?range={period}&interval={interval}
//
// The client owns its `reqwest::Client` (and so its connection pool); build
// one per process and share it through `AppState`.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::{MarketDataError, MarketDataProvider, RawBar, Series};
use crate::runtime_config::RuntimeConfig;

/// `range` values the chart endpoint documents.
const KNOWN_PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// `interval` values the chart endpoint documents.
const KNOWN_INTERVALS: &[&str] = &[
    "1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo",
];

// ---- wire format ----

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl ChartResult {
    /// Rows in timestamp order.  Placeholder rows without any price are
    /// dropped; a repeated timestamp (the live bar echoed after the last
    /// close) replaces the earlier row.
    fn into_rows(self) -> Result<Vec<RawBar>> {
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

        let mut rows: Vec<RawBar> = Vec::with_capacity(self.timestamp.len());
        for (i, &ts) in self.timestamp.iter().enumerate() {
            let row = RawBar {
                timestamp: DateTime::from_timestamp(ts, 0)
                    .with_context(|| format!("chart timestamp {ts} out of range"))?,
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
                volume: at(&quote.volume, i),
            };
            if row.is_blank() {
                continue;
            }
            match rows.last_mut() {
                Some(last) if last.timestamp == row.timestamp => *last = row,
                _ => rows.push(row),
            }
        }
        Ok(rows)
    }
}

// ---- client ----

#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    symbol_suffix: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(
        base_url: impl Into<String>,
        symbol_suffix: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tickerscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, "YahooClient initialised");

        Ok(Self {
            base_url,
            symbol_suffix: symbol_suffix.into(),
            client,
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Self::new(
            config.provider_base_url.clone(),
            config.symbol_suffix.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Ticker as the vendor knows it: index symbols (`^NSEI`) and symbols
    /// that already carry an exchange suffix are sent unchanged.
    pub fn resolve_symbol(&self, symbol: &str) -> String {
        let symbol = symbol.trim();
        if symbol.starts_with('^') || symbol.contains('.') {
            symbol.to_string()
        } else {
            format!("{symbol}{}", self.symbol_suffix)
        }
    }

    /// GET /v8/finance/chart/{symbol}.
    #[instrument(skip(self), name = "yahoo::get_chart")]
    pub async fn get_chart(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Series, MarketDataError> {
        if !KNOWN_PERIODS.contains(&period) {
            warn!(period, "period not in the documented set, requesting anyway");
        }
        if !KNOWN_INTERVALS.contains(&interval) {
            warn!(interval, "interval not in the documented set, requesting anyway");
        }

        let ticker = self.resolve_symbol(symbol);
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", period), ("interval", interval)])
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read chart response body")?;

        // Unknown tickers and rejected ranges come back as 4xx with a
        // well-formed error object.
        let envelope: ChartEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                let err = anyhow::anyhow!("Yahoo GET /v8/finance/chart returned {status}: {body}");
                return Err(err.into());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context("failed to parse chart response")
                    .into());
            }
        };

        if let Some(err) = envelope.chart.error {
            warn!(
                ticker = %ticker,
                code = %err.code,
                description = err.description.as_deref().unwrap_or(""),
                "chart endpoint reported an error"
            );
            return Err(MarketDataError::unavailable(&ticker, period, interval));
        }
        if !status.is_success() {
            let err = anyhow::anyhow!("Yahoo GET /v8/finance/chart returned {status}: {body}");
            return Err(err.into());
        }

        let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            return Err(MarketDataError::unavailable(&ticker, period, interval));
        };

        let rows = result.into_rows()?;
        if rows.is_empty() {
            return Err(MarketDataError::unavailable(&ticker, period, interval));
        }

        let series = Series::from_raw(rows)?;
        debug!(ticker = %ticker, period, interval, count = series.len(), "chart fetched");
        Ok(series)
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn get_series(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Series, MarketDataError> {
        self.get_chart(symbol, period, interval).await
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .field("symbol_suffix", &self.symbol_suffix)
            .finish()
    }
}
