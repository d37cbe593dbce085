// =============================================================================
// Indicator Errors
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong between receiving bars and emitting an
/// indicator series.
///
/// Only the structural variants (`MissingField`, `InvalidField`,
/// `UnorderedTimestamps`) abort a whole batch; the rest are isolated to the
/// indicator that produced them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("bar {index} is missing required field `{field}`")]
    MissingField { field: &'static str, index: usize },

    #[error("bar {index} has an invalid `{field}` value")]
    InvalidField { field: &'static str, index: usize },

    #[error("bar {index} is not later than the bar before it")]
    UnorderedTimestamps { index: usize },

    #[error("insufficient data: required {required} bars, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("invalid parameter for {indicator}: {reason}")]
    InvalidParameter {
        indicator: &'static str,
        reason: String,
    },
}

impl IndicatorError {
    /// True for errors caused by malformed input bars rather than by a
    /// particular indicator request.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::InvalidField { .. } | Self::UnorderedTimestamps { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IndicatorError>;
