// =============================================================================
// Bars and Series
// =============================================================================
//
// A `Series` is the validated, time-ordered input of every indicator.  All
// structural checks happen once, here, so indicator code can assume finite
// prices and strictly increasing timestamps.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::error::{IndicatorError, Result};

/// One OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// A bar as delivered by a provider, before validation.  Providers report
/// gaps as nulls, so every price is optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// True when the provider sent a placeholder row with no prices at all
    /// (typically a market holiday inside the requested range).
    pub fn is_blank(&self) -> bool {
        self.open.is_none() && self.high.is_none() && self.low.is_none() && self.close.is_none()
    }

    /// Convert into a `Bar`.  A missing volume is read as zero; a missing
    /// price is an error naming the field.
    fn into_bar(self, index: usize) -> Result<Bar> {
        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or(IndicatorError::MissingField { field, index })
        };
        Ok(Bar::new(
            self.timestamp,
            require(self.open, "open")?,
            require(self.high, "high")?,
            require(self.low, "low")?,
            require(self.close, "close")?,
            self.volume.unwrap_or(0.0),
        ))
    }
}

/// Validated, strictly time-ordered bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Validate `bars` and wrap them.
    ///
    /// Fails when a price is non-finite, the volume is negative or
    /// non-finite, or a timestamp does not strictly follow its predecessor.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        for (index, bar) in bars.iter().enumerate() {
            for (field, value) in [
                ("open", bar.open),
                ("high", bar.high),
                ("low", bar.low),
                ("close", bar.close),
            ] {
                if !value.is_finite() {
                    return Err(IndicatorError::InvalidField { field, index });
                }
            }
            if !bar.volume.is_finite() || bar.volume < 0.0 {
                return Err(IndicatorError::InvalidField {
                    field: "volume",
                    index,
                });
            }
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(IndicatorError::UnorderedTimestamps { index });
            }
        }
        Ok(Self { bars })
    }

    /// Build a series from provider rows, failing on the first row that
    /// lacks a required price.
    pub fn from_raw(raw: Vec<RawBar>) -> Result<Self> {
        let bars = raw
            .into_iter()
            .enumerate()
            .map(|(index, row)| row.into_bar(index))
            .collect::<Result<Vec<_>>>()?;
        Self::new(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

#[cfg(test)]
pub(crate) fn test_bar(minute: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
    let timestamp = DateTime::from_timestamp(1_700_000_000 + minute * 60, 0).unwrap();
    Bar::new(timestamp, open, high, low, close, 1_000.0)
}

/// Bars whose close follows `closes`, with a fixed one-point range.
#[cfg(test)]
pub(crate) fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| test_bar(i as i64, c, c + 1.0, c - 1.0, c))
        .collect()
}
