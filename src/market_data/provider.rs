// =============================================================================
// Market Data Provider
// =============================================================================
//
// The seam between the indicator engine and whatever vendor delivers bars.
// Implementations own their transport (HTTP client, session) and are
// constructed explicitly by the caller.
// =============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::indicators::IndicatorError;
use crate::market_data::Series;

/// Failures of a `get_series` call.
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// The symbol/period/interval combination yielded no bars.
    #[error("no data available for {symbol} (period={period}, interval={interval})")]
    DataUnavailable {
        symbol: String,
        period: String,
        interval: String,
    },

    /// The provider answered, but with bars that do not form a valid series.
    #[error("provider returned a malformed series: {0}")]
    InvalidSeries(#[from] IndicatorError),

    /// Transport or decoding failure talking to the vendor.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl MarketDataError {
    pub fn unavailable(symbol: &str, period: &str, interval: &str) -> Self {
        Self::DataUnavailable {
            symbol: symbol.to_string(),
            period: period.to_string(),
            interval: interval.to_string(),
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the bars of `symbol` covering `period` (e.g. `1y`) at
    /// `interval` (e.g. `1d`), oldest first.
    async fn get_series(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Series, MarketDataError>;
}

/// In-memory provider keyed by symbol, for exercising the API without a
/// network.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct StaticProvider {
    pub series: std::collections::HashMap<String, Series>,
}

#[cfg(test)]
#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn get_series(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Series, MarketDataError> {
        match self.series.get(symbol) {
            Some(series) if !series.is_empty() => Ok(series.clone()),
            _ => Err(MarketDataError::unavailable(symbol, period, interval)),
        }
    }
}
