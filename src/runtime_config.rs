// =============================================================================
// Runtime Configuration: service settings with atomic save
// =============================================================================
//
// Every tunable of the indicator service lives here: where it listens, which
// market-data endpoint it talks to, and the study preset served by default.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{parse_studies, IndicatorSpec};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:7860".to_string()
}

fn default_provider_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_symbol_suffix() -> String {
    ".NS".to_string()
}

fn default_period() -> String {
    "1y".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_studies() -> Vec<String> {
    [
        "SMA:20",
        "SMA:50",
        "EMA:20",
        "EMA:50",
        "MACD",
        "RSI:14",
        "BOLLINGER",
        "ADX:14",
        "SUPERTREND:10,3",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration of the indicator service.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the chart endpoint (overridable for tests and mirrors).
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// Exchange suffix appended to bare symbols, e.g. `.NS` for NSE listings.
    #[serde(default = "default_symbol_suffix")]
    pub symbol_suffix: String,

    #[serde(default = "default_period")]
    pub default_period: String,

    #[serde(default = "default_interval")]
    pub default_interval: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Study preset served by `/api/v1/studies`, as `KIND` or `KIND:a,b`.
    #[serde(default = "default_studies")]
    pub default_studies: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            provider_base_url: default_provider_base_url(),
            symbol_suffix: default_symbol_suffix(),
            default_period: default_period(),
            default_interval: default_interval(),
            request_timeout_secs: default_request_timeout_secs(),
            default_studies: default_studies(),
        }
    }
}

impl RuntimeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        // Fail at startup rather than on the first studies request.
        config.studies()?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            studies = config.default_studies.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        // Atomic write: write to a temporary sibling file, then rename.
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Apply `TICKERSCOPE_BIND_ADDR` / `TICKERSCOPE_SYMBOL_SUFFIX` overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("TICKERSCOPE_BIND_ADDR") {
            if addr.trim().is_empty() {
                warn!("TICKERSCOPE_BIND_ADDR is empty, keeping {}", self.bind_addr);
            } else {
                self.bind_addr = addr;
            }
        }
        // An empty suffix is meaningful: symbols are sent as given.
        if let Some(suffix) = lookup("TICKERSCOPE_SYMBOL_SUFFIX") {
            self.symbol_suffix = suffix;
        }
    }

    /// Parsed study preset.
    pub fn studies(&self) -> Result<Vec<IndicatorSpec>> {
        parse_studies(&self.default_studies).context("invalid default_studies entry")
    }
}
