// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and speak JSON only; rendering charts
// or tables from the reports is left to the client.
//
// CORS is configured permissively; the service holds no user data.
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::app_state::AppState;
use crate::engine::{
    compute_indicators, compute_studies, parse_kinds, parse_params, IndicatorReport, StudyReport,
};
use crate::market_data::{MarketDataError, Series};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/indicators", post(indicators))
        .route("/api/v1/studies/:symbol", get(studies))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    requests_served: u64,
    recent_errors: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        requests_served: state.requests_served.load(std::sync::atomic::Ordering::Relaxed),
        recent_errors: state.recent_errors.read().len(),
    };
    Json(resp)
}

// =============================================================================
// Shared fetch
// =============================================================================

/// Period and interval from the request, falling back to the configured
/// defaults.
fn resolve_window(
    state: &AppState,
    period: Option<String>,
    interval: Option<String>,
) -> (String, String) {
    let config = state.runtime_config.read();
    (
        period.unwrap_or_else(|| config.default_period.clone()),
        interval.unwrap_or_else(|| config.default_interval.clone()),
    )
}

async fn fetch_series(
    state: &AppState,
    symbol: &str,
    period: &str,
    interval: &str,
) -> Result<Series, ApiError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ApiError::BadRequest("symbol must not be empty".into()));
    }

    state.record_request();
    match state.provider.get_series(symbol, period, interval).await {
        Ok(series) => Ok(series),
        Err(e) => {
            if !matches!(e, MarketDataError::DataUnavailable { .. }) {
                warn!(symbol, error = %e, "market data fetch failed");
                state.push_error(e.to_string(), Some(symbol));
            }
            Err(e.into())
        }
    }
}

// =============================================================================
// Indicators
// =============================================================================

#[derive(Debug, Deserialize)]
struct IndicatorRequest {
    symbol: String,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    interval: Option<String>,
    indicators: Vec<String>,
    /// Positional parameters keyed by indicator name, e.g. `{"sma": [50]}`.
    #[serde(default)]
    params: HashMap<String, Vec<f64>>,
}

async fn indicators(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IndicatorRequest>,
) -> Result<Json<IndicatorReport>, ApiError> {
    // Reject bad names before spending a round trip on the provider.
    let kinds = parse_kinds(&req.indicators)?;
    let params = parse_params(&req.params)?;
    let (period, interval) = resolve_window(&state, req.period, req.interval);

    let series = fetch_series(&state, &req.symbol, &period, &interval).await?;

    let report =
        tokio::task::spawn_blocking(move || compute_indicators(&series, &kinds, &params)).await?;

    info!(
        symbol = %req.symbol,
        bars = report.timestamps.len(),
        computed = report.outputs.len(),
        failed = report.failures.len(),
        "indicator report served"
    );
    Ok(Json(report))
}

// =============================================================================
// Studies (configured preset)
// =============================================================================

#[derive(Debug, Deserialize)]
struct StudyQuery {
    period: Option<String>,
    interval: Option<String>,
}

async fn studies(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<StudyQuery>,
) -> Result<Json<StudyReport>, ApiError> {
    let specs = state
        .runtime_config
        .read()
        .studies()
        .map_err(|e| ApiError::Internal(format!("{e:#}")))?;
    let (period, interval) = resolve_window(&state, query.period, query.interval);

    let series = fetch_series(&state, &symbol, &period, &interval).await?;

    let report = tokio::task::spawn_blocking(move || compute_studies(&series, &specs)).await?;

    info!(
        symbol = %symbol,
        bars = report.timestamps.len(),
        studies = report.studies.len(),
        "study report served"
    );
    Ok(Json(report))
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::market_data::provider::StaticProvider;
    use crate::market_data::series::bars_from_closes;
    use crate::runtime_config::RuntimeConfig;

    fn app() -> Router {
        let closes: Vec<f64> = (0..80)
            .map(|i| 500.0 + (i as f64 * 0.25).sin() * 20.0 + i as f64)
            .collect();
        let mut provider = StaticProvider::default();
        provider
            .series
            .insert("TCS".into(), Series::new(bars_from_closes(&closes)).unwrap());
        router(Arc::new(AppState::new(RuntimeConfig::default(), Arc::new(provider))))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let request = Request::get("/api/v1/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tickerscope");
    }

    #[tokio::test]
    async fn computes_requested_indicators() {
        let request = post_json(
            "/api/v1/indicators",
            json!({
                "symbol": "TCS",
                "indicators": ["sma", "RSI", "supertrend", "stockstick"],
                "params": { "sma": [5] }
            }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timestamps"].as_array().unwrap().len(), 80);
        assert_eq!(body["outputs"]["SMA"]["name"], "SMA(5)");
        assert_eq!(body["outputs"]["SMA"]["values"][3], Value::Null);
        assert!(body["outputs"]["SMA"]["values"][4].is_number());
        assert_eq!(body["outputs"]["SUPERTREND"]["type"], "supertrend");
        assert_eq!(body["outputs"]["STOCKSTICK"]["sticks"].as_array().unwrap().len(), 80);
        let color = body["outputs"]["STOCKSTICK"]["colors"][0].as_str().unwrap();
        assert!(color == "green" || color == "red");
        assert!(body["failures"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_indicator_is_bad_request() {
        let request = post_json(
            "/api/v1/indicators",
            json!({ "symbol": "TCS", "indicators": ["SMA", "VWAP"] }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unknown indicator: VWAP");
    }

    #[tokio::test]
    async fn bad_params_are_reported_per_indicator() {
        let request = post_json(
            "/api/v1/indicators",
            json!({
                "symbol": "TCS",
                "indicators": ["EMA", "MACD"],
                "params": { "macd": [26, 12] }
            }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["outputs"]["EMA"].is_object());
        assert!(body["outputs"].get("MACD").is_none());
        assert_eq!(body["failures"][0]["indicator"], "MACD");
    }

    #[tokio::test]
    async fn unknown_symbol_is_not_found() {
        let request = post_json(
            "/api/v1/indicators",
            json!({ "symbol": "NOPE", "indicators": ["SMA"] }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("NOPE"));
    }

    #[tokio::test]
    async fn blank_symbol_is_bad_request() {
        let request = post_json(
            "/api/v1/indicators",
            json!({ "symbol": "  ", "indicators": ["SMA"] }),
        );
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn studies_use_configured_preset() {
        let request = Request::get("/api/v1/studies/TCS?period=6mo")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        let studies = body["studies"].as_object().unwrap();
        assert_eq!(studies.len(), 9);
        assert!(studies.contains_key("SMA(20)"));
        assert!(studies.contains_key("SMA(50)"));
        assert_eq!(studies["ADX(14)"]["type"], "adx");
        assert!(body["warnings"].as_array().unwrap().is_empty());
    }
}
