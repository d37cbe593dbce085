// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler via `Arc<AppState>`.
//
// Thread safety:
//   - Atomic counter for lock-free request accounting.
//   - parking_lot::RwLock for the config and the recent-error log.
//   - The market-data provider is an `Arc<dyn MarketDataProvider>` that
//     manages its own connection pool.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::market_data::MarketDataProvider;
use crate::runtime_config::RuntimeConfig;

/// A recorded upstream failure, surfaced by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// Symbol whose request failed, when known.
    pub symbol: Option<String>,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

pub struct AppState {
    pub runtime_config: RwLock<RuntimeConfig>,
    pub provider: Arc<dyn MarketDataProvider>,

    /// Number of indicator/study requests that reached the provider.
    pub requests_served: AtomicU64,
    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            runtime_config: RwLock::new(config),
            provider,
            requests_served: AtomicU64::new(0),
            recent_errors: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record an error.  The log is capped at [`MAX_RECENT_ERRORS`]; oldest
    /// entries are evicted when the limit is reached.
    pub fn push_error(&self, message: String, symbol: Option<&str>) {
        let record = ErrorRecord {
            message,
            symbol: symbol.map(str::to_string),
            at: Utc::now().to_rfc3339(),
        };

        let mut errors = self.recent_errors.write();
        errors.push(record);
        while errors.len() > MAX_RECENT_ERRORS {
            errors.remove(0);
        }
    }
}
