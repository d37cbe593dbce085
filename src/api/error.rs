// =============================================================================
// API error mapping
// =============================================================================
//
// Every handler returns `Result<_, ApiError>`; the rejection renders as
// `{"error": "<message>"}` with a status derived from the underlying failure:
//
//   unknown indicator / bad parameter / bad request  => 400
//   no data for symbol                               => 404
//   malformed bars from the provider                 => 422
//   transport or vendor failure                      => 502
//   task failure inside the service                  => 500
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::indicators::IndicatorError;
use crate::market_data::MarketDataError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Indicator(e) if e.is_structural() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Indicator(_) => StatusCode::BAD_REQUEST,
            Self::MarketData(MarketDataError::DataUnavailable { .. }) => StatusCode::NOT_FOUND,
            Self::MarketData(MarketDataError::InvalidSeries(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MarketData(MarketDataError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(format!("computation task failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        }
        let body = serde_json::json!({
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let unknown: ApiError = IndicatorError::UnknownIndicator("VWAP".into()).into();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

        let structural: ApiError = IndicatorError::UnorderedTimestamps { index: 2 }.into();
        assert_eq!(structural.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing: ApiError = MarketDataError::unavailable("X.NS", "1y", "1d").into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let upstream: ApiError = MarketDataError::from(anyhow::anyhow!("timeout")).into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.to_string(), "timeout");
    }
}
