// =============================================================================
// Tickerscope: Main Entry Point
// =============================================================================
//
// Serves technical-indicator reports (SMA, EMA, MACD, RSI, Bollinger,
// Keltner, SuperTrend, ZigZag, swings, ADX, ROC) over a JSON API, computed
// from Yahoo Finance chart history.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod engine;
mod indicators;
mod market_data;
mod runtime_config;
mod types;
mod yahoo;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;
use crate::yahoo::YahooClient;

const DEFAULT_CONFIG_PATH: &str = "tickerscope.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Tickerscope starting up");

    let config_path: PathBuf = std::env::var("TICKERSCOPE_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into())
        .into();

    let mut config = if config_path.exists() {
        RuntimeConfig::load(&config_path)?
    } else {
        warn!(path = %config_path.display(), "No config file found, writing defaults");
        let config = RuntimeConfig::default();
        if let Err(e) = config.save(&config_path) {
            warn!(error = %e, "Failed to write default config, continuing with defaults");
        }
        config
    };
    config.apply_env_overrides();

    info!(
        bind_addr = %config.bind_addr,
        provider = %config.provider_base_url,
        symbol_suffix = %config.symbol_suffix,
        period = %config.default_period,
        interval = %config.default_interval,
        "Configuration resolved"
    );

    // ── 2. Market data provider & shared state ───────────────────────────
    let provider = Arc::new(YahooClient::from_config(&config)?);
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, provider));

    // ── 3. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening. Press Ctrl+C to stop.");

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        warn!("Shutdown signal received, stopping gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("API server failed")?;

    info!(
        requests_served = state.requests_served.load(std::sync::atomic::Ordering::Relaxed),
        "Tickerscope shut down complete."
    );
    Ok(())
}
