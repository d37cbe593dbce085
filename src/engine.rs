// =============================================================================
// Indicator Engine
// =============================================================================
//
// Turns a validated `Series` plus a list of requested indicators into a
// report of bar-aligned outputs.
//
// Pipeline per request:
//   1. Resolve each requested kind into an `IndicatorSpec` (defaults merged
//      with caller parameters, parameters validated)
//   2. Compute every `IndicatorSpec` independently over the same bars
//   3. Collect parameter failures and warm-up warnings next to the outputs
//
// A failure in one indicator never aborts the others.  Structural problems
// with the bars themselves are rejected earlier, when the `Series` is built.
// =============================================================================

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::indicators::adx::{calculate_adx, AdxSeries};
use crate::indicators::bollinger::{calculate_bollinger, BandSeries};
use crate::indicators::ema::calculate_ema;
use crate::indicators::error::Result;
use crate::indicators::keltner::calculate_keltner;
use crate::indicators::macd::{calculate_macd, MacdSeries};
use crate::indicators::roc::calculate_roc;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::indicators::stockstick::classify_sticks;
use crate::indicators::supertrend::{calculate_supertrend, SuperTrendSeries};
use crate::indicators::swing::{calculate_swings, SwingSeries};
use crate::indicators::zigzag::calculate_zigzag;
use crate::indicators::{IndicatorError, IndicatorSeries};
use crate::market_data::Series;
use crate::types::Stick;

// =============================================================================
// Indicator kinds
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Macd,
    Rsi,
    Bollinger,
    Keltner,
    Supertrend,
    Zigzag,
    Swing,
    Stockstick,
    Adx,
    Roc,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 12] = [
        Self::Sma,
        Self::Ema,
        Self::Macd,
        Self::Rsi,
        Self::Bollinger,
        Self::Keltner,
        Self::Supertrend,
        Self::Zigzag,
        Self::Swing,
        Self::Stockstick,
        Self::Adx,
        Self::Roc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Macd => "MACD",
            Self::Rsi => "RSI",
            Self::Bollinger => "BOLLINGER",
            Self::Keltner => "KELTNER",
            Self::Supertrend => "SUPERTREND",
            Self::Zigzag => "ZIGZAG",
            Self::Swing => "SWING",
            Self::Stockstick => "STOCKSTICK",
            Self::Adx => "ADX",
            Self::Roc => "ROC",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "BBANDS" {
            return Ok(Self::Bollinger);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == upper)
            .ok_or_else(|| IndicatorError::UnknownIndicator(s.trim().to_string()))
    }
}

/// Caller-supplied positional parameters per kind.
pub type ParamMap = HashMap<IndicatorKind, Vec<f64>>;

// =============================================================================
// Indicator specs: a kind with resolved parameters
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorSpec {
    Sma { period: usize },
    Ema { period: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Rsi { period: usize },
    Bollinger { period: usize, num_std: f64 },
    Keltner { period: usize, multiplier: f64 },
    Supertrend { period: usize, multiplier: f64 },
    Zigzag { change_pct: f64 },
    Swing { window: usize },
    Stockstick,
    Adx { period: usize },
    Roc { period: usize },
}

/// Positional parameter reader: `given[pos]` when present, else the default.
struct Params<'a> {
    kind: IndicatorKind,
    given: &'a [f64],
}

impl Params<'_> {
    fn invalid(&self, reason: String) -> IndicatorError {
        IndicatorError::InvalidParameter {
            indicator: self.kind.name(),
            reason,
        }
    }

    fn expect_at_most(&self, count: usize) -> Result<()> {
        if self.given.len() > count {
            return Err(self.invalid(format!(
                "expected at most {count} parameters, got {}",
                self.given.len()
            )));
        }
        Ok(())
    }

    fn period(&self, pos: usize, default: usize) -> Result<usize> {
        let Some(&raw) = self.given.get(pos) else {
            return Ok(default);
        };
        if !raw.is_finite() || raw < 1.0 || raw.fract() != 0.0 {
            return Err(self.invalid(format!("period must be a positive integer, got {raw}")));
        }
        Ok(raw as usize)
    }

    fn positive(&self, pos: usize, default: f64) -> Result<f64> {
        let Some(&raw) = self.given.get(pos) else {
            return Ok(default);
        };
        if !raw.is_finite() || raw <= 0.0 {
            return Err(self.invalid(format!("expected a positive number, got {raw}")));
        }
        Ok(raw)
    }
}

impl IndicatorSpec {
    /// Merge `params` (positional, may be shorter than the full list) over
    /// the defaults of `kind` and validate the result.
    pub fn resolve(kind: IndicatorKind, params: Option<&[f64]>) -> Result<Self> {
        Self::resolve_params(kind, params.unwrap_or(&[]))
    }

    fn resolve_params(kind: IndicatorKind, given: &[f64]) -> Result<Self> {
        let p = Params { kind, given };
        let spec = match kind {
            IndicatorKind::Sma => {
                p.expect_at_most(1)?;
                Self::Sma {
                    period: p.period(0, 20)?,
                }
            }
            IndicatorKind::Ema => {
                p.expect_at_most(1)?;
                Self::Ema {
                    period: p.period(0, 20)?,
                }
            }
            IndicatorKind::Macd => {
                p.expect_at_most(3)?;
                let (fast, slow, signal) = (p.period(0, 12)?, p.period(1, 26)?, p.period(2, 9)?);
                if fast >= slow {
                    return Err(p.invalid(format!(
                        "fast period {fast} must be shorter than slow period {slow}"
                    )));
                }
                Self::Macd { fast, slow, signal }
            }
            IndicatorKind::Rsi => {
                p.expect_at_most(1)?;
                Self::Rsi {
                    period: p.period(0, 14)?,
                }
            }
            IndicatorKind::Bollinger => {
                p.expect_at_most(2)?;
                Self::Bollinger {
                    period: p.period(0, 20)?,
                    num_std: p.positive(1, 2.0)?,
                }
            }
            IndicatorKind::Keltner => {
                p.expect_at_most(2)?;
                Self::Keltner {
                    period: p.period(0, 20)?,
                    multiplier: p.positive(1, 2.0)?,
                }
            }
            IndicatorKind::Supertrend => {
                p.expect_at_most(2)?;
                Self::Supertrend {
                    period: p.period(0, 10)?,
                    multiplier: p.positive(1, 3.0)?,
                }
            }
            IndicatorKind::Zigzag => {
                p.expect_at_most(1)?;
                Self::Zigzag {
                    change_pct: p.positive(0, 5.0)?,
                }
            }
            IndicatorKind::Swing => {
                p.expect_at_most(1)?;
                Self::Swing {
                    window: p.period(0, 5)?,
                }
            }
            IndicatorKind::Stockstick => {
                p.expect_at_most(0)?;
                Self::Stockstick
            }
            IndicatorKind::Adx => {
                p.expect_at_most(1)?;
                Self::Adx {
                    period: p.period(0, 14)?,
                }
            }
            IndicatorKind::Roc => {
                p.expect_at_most(1)?;
                Self::Roc {
                    period: p.period(0, 10)?,
                }
            }
        };
        Ok(spec)
    }

    pub fn kind(&self) -> IndicatorKind {
        match self {
            Self::Sma { .. } => IndicatorKind::Sma,
            Self::Ema { .. } => IndicatorKind::Ema,
            Self::Macd { .. } => IndicatorKind::Macd,
            Self::Rsi { .. } => IndicatorKind::Rsi,
            Self::Bollinger { .. } => IndicatorKind::Bollinger,
            Self::Keltner { .. } => IndicatorKind::Keltner,
            Self::Supertrend { .. } => IndicatorKind::Supertrend,
            Self::Zigzag { .. } => IndicatorKind::Zigzag,
            Self::Swing { .. } => IndicatorKind::Swing,
            Self::Stockstick => IndicatorKind::Stockstick,
            Self::Adx { .. } => IndicatorKind::Adx,
            Self::Roc { .. } => IndicatorKind::Roc,
        }
    }

    /// Display label, e.g. `SMA(20)` or `MACD(12,26,9)`.
    pub fn label(&self) -> String {
        let kind = self.kind();
        match *self {
            Self::Sma { period }
            | Self::Ema { period }
            | Self::Rsi { period }
            | Self::Adx { period }
            | Self::Roc { period } => format!("{kind}({period})"),
            Self::Macd { fast, slow, signal } => format!("{kind}({fast},{slow},{signal})"),
            Self::Bollinger {
                period,
                num_std: k,
            }
            | Self::Keltner {
                period,
                multiplier: k,
            }
            | Self::Supertrend {
                period,
                multiplier: k,
            } => format!("{kind}({period},{k})"),
            Self::Zigzag { change_pct } => format!("{kind}({change_pct})"),
            Self::Swing { window } => format!("{kind}({window})"),
            Self::Stockstick => kind.to_string(),
        }
    }

    /// Number of bars needed before every component of the output has a
    /// defined value (the MACD signal line, the ADX line).  Saturates for
    /// absurdly large parameters.
    pub fn warm_up(&self) -> usize {
        match *self {
            Self::Sma { period }
            | Self::Ema { period }
            | Self::Bollinger { period, .. }
            | Self::Keltner { period, .. }
            | Self::Supertrend { period, .. } => period,
            Self::Rsi { period } | Self::Roc { period } => period.saturating_add(1),
            Self::Macd { slow, signal, .. } => slow.saturating_add(signal) - 1,
            Self::Adx { period } => period.saturating_mul(2),
            Self::Swing { window } => window.saturating_mul(2).saturating_add(1),
            Self::Zigzag { .. } | Self::Stockstick => 1,
        }
    }

    pub fn compute(&self, series: &Series) -> IndicatorOutput {
        let bars = series.bars();
        let closes = || series.closes();
        let line = |values: Vec<Option<f64>>| {
            IndicatorOutput::Line(IndicatorSeries::new(self.label(), values))
        };

        match *self {
            Self::Sma { period } => line(calculate_sma(&closes(), period)),
            Self::Ema { period } => line(calculate_ema(&closes(), period)),
            Self::Rsi { period } => line(calculate_rsi(&closes(), period)),
            Self::Roc { period } => line(calculate_roc(&closes(), period)),
            Self::Zigzag { change_pct } => line(calculate_zigzag(&closes(), change_pct)),
            Self::Macd { fast, slow, signal } => {
                IndicatorOutput::Macd(calculate_macd(&closes(), fast, slow, signal))
            }
            Self::Bollinger { period, num_std } => {
                IndicatorOutput::Bands(calculate_bollinger(&closes(), period, num_std))
            }
            Self::Keltner { period, multiplier } => {
                IndicatorOutput::Bands(calculate_keltner(bars, period, multiplier))
            }
            Self::Supertrend { period, multiplier } => {
                IndicatorOutput::Supertrend(calculate_supertrend(bars, period, multiplier))
            }
            Self::Swing { window } => IndicatorOutput::Swing(calculate_swings(bars, window)),
            Self::Stockstick => {
                let sticks = classify_sticks(bars);
                let colors = sticks.iter().map(|s| s.color()).collect();
                IndicatorOutput::Sticks { sticks, colors }
            }
            Self::Adx { period } => IndicatorOutput::Adx(calculate_adx(bars, period)),
        }
    }
}

impl FromStr for IndicatorSpec {
    type Err = IndicatorError;

    /// Parse `KIND` or `KIND:a,b,c`, e.g. `SMA:50` or `SUPERTREND:10,3`.
    fn from_str(s: &str) -> Result<Self> {
        let (name, args) = match s.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (s, None),
        };
        let kind: IndicatorKind = name.parse()?;

        let params = args
            .map(|args| {
                args.split(',')
                    .map(|a| {
                        a.trim().parse::<f64>().map_err(|_| IndicatorError::InvalidParameter {
                            indicator: kind.name(),
                            reason: format!("`{}` is not a number", a.trim()),
                        })
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .transpose()?;

        Self::resolve(kind, params.as_deref())
    }
}

// =============================================================================
// Outputs and reports
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorOutput {
    Line(IndicatorSeries),
    Macd(MacdSeries),
    Bands(BandSeries),
    Supertrend(SuperTrendSeries),
    Swing(SwingSeries),
    Sticks {
        sticks: Vec<Stick>,
        /// Chart colour per candle, `green` or `red`.
        colors: Vec<&'static str>,
    },
    Adx(AdxSeries),
}

impl IndicatorOutput {
    /// Number of bars the output is aligned with.
    pub fn len(&self) -> usize {
        match self {
            Self::Line(s) => s.len(),
            Self::Macd(m) => m.macd.len(),
            Self::Bands(b) => b.len(),
            Self::Supertrend(s) => s.value.len(),
            Self::Swing(s) => s.highs.len(),
            Self::Sticks { sticks, .. } => sticks.len(),
            Self::Adx(a) => a.adx.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn serialize_display<S: Serializer>(
    err: &IndicatorError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

/// A failure or warning attached to one requested indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub indicator: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: IndicatorError,
}

/// Result of [`compute_indicators`], keyed by kind.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorReport {
    pub timestamps: Vec<DateTime<Utc>>,
    pub outputs: BTreeMap<IndicatorKind, IndicatorOutput>,
    /// Indicators that could not be computed (bad parameters).
    pub failures: Vec<Diagnostic>,
    /// Indicators computed over fewer bars than their warm-up; at least one
    /// component of their output (possibly all of it) stays undefined.
    pub warnings: Vec<Diagnostic>,
}

/// Result of [`compute_studies`], keyed by study label.
#[derive(Debug, Clone, Serialize)]
pub struct StudyReport {
    pub timestamps: Vec<DateTime<Utc>>,
    pub studies: BTreeMap<String, IndicatorOutput>,
    pub warnings: Vec<Diagnostic>,
}

fn warm_up_warning(spec: &IndicatorSpec, series: &Series) -> Option<Diagnostic> {
    let required = spec.warm_up();
    if series.is_empty() || series.len() >= required {
        return None;
    }
    warn!(
        indicator = %spec.label(),
        required,
        got = series.len(),
        "series shorter than indicator warm-up"
    );
    Some(Diagnostic {
        indicator: spec.label(),
        error: IndicatorError::InsufficientData {
            required,
            got: series.len(),
        },
    })
}

/// Compute each requested kind over `series`.
///
/// Parameters come from `params` where present and from the kind's defaults
/// otherwise.  A kind requested twice is computed once.  An empty series
/// yields an empty output for every valid request.
pub fn compute_indicators(
    series: &Series,
    requested: &[IndicatorKind],
    params: &ParamMap,
) -> IndicatorReport {
    let mut report = IndicatorReport {
        timestamps: series.timestamps(),
        outputs: BTreeMap::new(),
        failures: Vec::new(),
        warnings: Vec::new(),
    };

    for &kind in requested {
        if report.outputs.contains_key(&kind) {
            continue;
        }
        let spec = match IndicatorSpec::resolve(kind, params.get(&kind).map(Vec::as_slice)) {
            Ok(spec) => spec,
            Err(error) => {
                warn!(indicator = %kind, %error, "indicator skipped");
                report.failures.push(Diagnostic {
                    indicator: kind.to_string(),
                    error,
                });
                continue;
            }
        };

        report.warnings.extend(warm_up_warning(&spec, series));
        let output = spec.compute(series);
        debug!(indicator = %spec.label(), bars = output.len(), "indicator computed");
        report.outputs.insert(kind, output);
    }

    report
}

/// Compute already-resolved studies over `series`, keyed by label so that one
/// request can carry several parameterisations of the same kind.
pub fn compute_studies(series: &Series, specs: &[IndicatorSpec]) -> StudyReport {
    let mut report = StudyReport {
        timestamps: series.timestamps(),
        studies: BTreeMap::new(),
        warnings: Vec::new(),
    };

    for spec in specs {
        let label = spec.label();
        if report.studies.contains_key(&label) {
            continue;
        }
        report.warnings.extend(warm_up_warning(spec, series));
        let output = spec.compute(series);
        debug!(study = %label, bars = output.len(), "study computed");
        report.studies.insert(label, output);
    }

    report
}

// =============================================================================
// Request parsing helpers
// =============================================================================

/// Parse indicator names; the first unknown name fails the whole list.
pub fn parse_kinds<S: AsRef<str>>(names: &[S]) -> Result<Vec<IndicatorKind>> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

/// Parse a name-keyed parameter map into a [`ParamMap`].
pub fn parse_params(raw: &HashMap<String, Vec<f64>>) -> Result<ParamMap> {
    raw.iter()
        .map(|(name, values)| -> Result<(IndicatorKind, Vec<f64>)> {
            Ok((name.parse()?, values.clone()))
        })
        .collect()
}

/// Parse study strings such as `SMA:50` or `MACD`.
pub fn parse_studies<S: AsRef<str>>(entries: &[S]) -> Result<Vec<IndicatorSpec>> {
    entries.iter().map(|e| e.as_ref().parse()).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::bars_from_closes;
    use crate::types::Trend;

    fn series(n: usize) -> Series {
        let closes: Vec<f64> = (0..n)
            .map(|i| 100.0 + (i as f64 * 0.2).sin() * 8.0 + i as f64 * 0.1)
            .collect();
        Series::new(bars_from_closes(&closes)).unwrap()
    }

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!("sma".parse::<IndicatorKind>().unwrap(), IndicatorKind::Sma);
        assert_eq!(" SuperTrend ".parse::<IndicatorKind>().unwrap(), IndicatorKind::Supertrend);
        assert_eq!("bbands".parse::<IndicatorKind>().unwrap(), IndicatorKind::Bollinger);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = "VWAP".parse::<IndicatorKind>().unwrap_err();
        assert_eq!(err, IndicatorError::UnknownIndicator("VWAP".into()));
        assert!(parse_kinds(&["SMA", "VWAP"]).is_err());
    }

    #[test]
    fn defaults_and_overrides() {
        assert_eq!(
            IndicatorSpec::resolve(IndicatorKind::Macd, None).unwrap(),
            IndicatorSpec::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
        assert_eq!(
            IndicatorSpec::resolve(IndicatorKind::Supertrend, Some(&[7.0])).unwrap(),
            IndicatorSpec::Supertrend {
                period: 7,
                multiplier: 3.0
            }
        );
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let bad = [
            (IndicatorKind::Sma, vec![0.0]),
            (IndicatorKind::Sma, vec![2.5]),
            (IndicatorKind::Sma, vec![5.0, 6.0]),
            (IndicatorKind::Macd, vec![26.0, 12.0]),
            (IndicatorKind::Zigzag, vec![-1.0]),
            (IndicatorKind::Bollinger, vec![20.0, f64::NAN]),
            (IndicatorKind::Stockstick, vec![1.0]),
        ];
        for (kind, params) in bad {
            let err = IndicatorSpec::resolve(kind, Some(&params)).unwrap_err();
            assert!(
                matches!(err, IndicatorError::InvalidParameter { indicator, .. } if indicator == kind.name()),
                "{kind} {params:?} => {err:?}"
            );
        }
    }

    #[test]
    fn spec_strings_and_labels() {
        let spec: IndicatorSpec = "supertrend:10,3".parse().unwrap();
        assert_eq!(spec.label(), "SUPERTREND(10,3)");
        assert_eq!("SMA:50".parse::<IndicatorSpec>().unwrap().label(), "SMA(50)");
        assert_eq!("MACD".parse::<IndicatorSpec>().unwrap().label(), "MACD(12,26,9)");
        assert_eq!("stockstick".parse::<IndicatorSpec>().unwrap().label(), "STOCKSTICK");
        assert!("SMA:abc".parse::<IndicatorSpec>().is_err());
    }

    #[test]
    fn empty_series_yields_empty_outputs() {
        let empty = Series::new(Vec::new()).unwrap();
        let report = compute_indicators(&empty, &IndicatorKind::ALL, &ParamMap::new());
        assert_eq!(report.outputs.len(), IndicatorKind::ALL.len());
        assert!(report.outputs.values().all(IndicatorOutput::is_empty));
        assert!(report.failures.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.timestamps.is_empty());
    }

    #[test]
    fn every_output_is_bar_aligned() {
        let s = series(80);
        let report = compute_indicators(&s, &IndicatorKind::ALL, &ParamMap::new());
        for (kind, output) in &report.outputs {
            assert_eq!(output.len(), 80, "{kind} misaligned");
        }
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn bad_params_fail_only_their_indicator() {
        let s = series(40);
        let mut params = ParamMap::new();
        params.insert(IndicatorKind::Rsi, vec![0.0]);
        let report = compute_indicators(
            &s,
            &[IndicatorKind::Sma, IndicatorKind::Rsi, IndicatorKind::Stockstick],
            &params,
        );
        assert_eq!(report.outputs.len(), 2);
        assert!(!report.outputs.contains_key(&IndicatorKind::Rsi));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].indicator, "RSI");
    }

    #[test]
    fn short_series_warns_and_stays_undefined() {
        let s = series(10);
        let requested = [IndicatorKind::Sma, IndicatorKind::Stockstick];
        let report = compute_indicators(&s, &requested, &ParamMap::new());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.warnings[0].error,
            IndicatorError::InsufficientData { required: 20, got: 10 }
        );
        match &report.outputs[&IndicatorKind::Sma] {
            IndicatorOutput::Line(line) => assert!(line.values.iter().all(Option::is_none)),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn huge_periods_stay_undefined() {
        let s = series(5);
        let mut params = ParamMap::new();
        params.insert(IndicatorKind::Rsi, vec![1e20]);
        params.insert(IndicatorKind::Swing, vec![1e19]);
        params.insert(IndicatorKind::Adx, vec![1e19]);
        let requested = [IndicatorKind::Rsi, IndicatorKind::Swing, IndicatorKind::Adx];
        let report = compute_indicators(&s, &requested, &params);

        assert!(report.failures.is_empty());
        assert_eq!(report.warnings.len(), 3);
        let IndicatorOutput::Line(rsi) = &report.outputs[&IndicatorKind::Rsi] else {
            panic!("RSI should be a line");
        };
        assert!(rsi.values.iter().all(Option::is_none));
        let IndicatorOutput::Swing(swing) = &report.outputs[&IndicatorKind::Swing] else {
            panic!("expected swing output");
        };
        assert_eq!(swing.highs.len(), 5);
        assert!(swing.highs.iter().chain(&swing.lows).all(Option::is_none));
    }

    #[test]
    fn sma_one_reproduces_closes() {
        let s = series(30);
        let mut params = ParamMap::new();
        params.insert(IndicatorKind::Sma, vec![1.0]);
        let report = compute_indicators(&s, &[IndicatorKind::Sma], &params);
        let IndicatorOutput::Line(line) = &report.outputs[&IndicatorKind::Sma] else {
            panic!("SMA should be a line");
        };
        let closes: Vec<Option<f64>> = s.closes().into_iter().map(Some).collect();
        assert_eq!(line.values, closes);
    }

    #[test]
    fn studies_keep_each_parameterisation() {
        let s = series(60);
        let specs = parse_studies(&["SMA:20", "SMA:50", "SUPERTREND:10,3", "SMA:20"]).unwrap();
        let report = compute_studies(&s, &specs);
        let labels: Vec<&str> = report.studies.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["SMA(20)", "SMA(50)", "SUPERTREND(10,3)"]);

        let IndicatorOutput::Supertrend(st) = &report.studies["SUPERTREND(10,3)"] else {
            panic!("expected supertrend output");
        };
        assert!(st.trend.iter().flatten().all(|t| matches!(t, Trend::Up | Trend::Down)));
    }

    #[test]
    fn report_serialises_with_tags_and_nulls() {
        let s = series(3);
        let requested = [IndicatorKind::Sma, IndicatorKind::Stockstick];
        let report = compute_indicators(&s, &requested, &ParamMap::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outputs"]["SMA"]["type"], "line");
        assert_eq!(json["outputs"]["SMA"]["values"][0], serde_json::Value::Null);
        assert_eq!(json["outputs"]["STOCKSTICK"]["sticks"][0], "up");
        assert_eq!(json["outputs"]["STOCKSTICK"]["colors"][0], "green");
        assert_eq!(
            json["warnings"][0]["error"],
            "insufficient data: required 20 bars, got 3"
        );
    }

    #[test]
    fn param_map_from_names() {
        let mut raw = HashMap::new();
        raw.insert("rsi".to_string(), vec![7.0]);
        let params = parse_params(&raw).unwrap();
        assert_eq!(params[&IndicatorKind::Rsi], vec![7.0]);

        raw.insert("nope".to_string(), vec![]);
        assert!(parse_params(&raw).is_err());
    }
}
