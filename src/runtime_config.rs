// =============================================================================
// Runtime Configuration — service settings and indicator parameters
// =============================================================================
//
// Every tunable lives here: the HTTP bind address, the upstream kline limit
// and the parameters of each indicator.  The config is loaded once at startup
// and handed to every request by value, so no request ever observes another's
// settings.
//
// All fields carry `#[serde(default)]` so that a partial JSON file (or an
// empty `{}`) still yields a complete configuration.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Largest `limit` accepted by the Binance klines endpoint.
pub const MAX_REQUEST_LIMIT: u32 = 1000;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_request_limit() -> u32 {
    600
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

fn default_assets() -> Vec<String> {
    vec![
        "BTC".to_string(),
        "ETH".to_string(),
        "BNB".to_string(),
        "XRP".to_string(),
        "SOL".to_string(),
    ]
}

fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_binance_base_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_sma_periods() -> Vec<usize> {
    vec![200]
}

fn default_ema_period() -> usize {
    50
}

fn default_rsi_period() -> usize {
    14
}

// =============================================================================
// Indicator parameters
// =============================================================================

/// MACD fast / slow / signal periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Bollinger window and band width in standard deviations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerParams {
    pub period: usize,
    pub num_std: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            num_std: 2.0,
        }
    }
}

/// Stochastic RSI periods, each independently tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochRsiParams {
    pub rsi_period: usize,
    pub k_period: usize,
    pub d_period: usize,
}

impl Default for StochRsiParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            k_period: 14,
            d_period: 3,
        }
    }
}

/// Names of the two indicator-set entries compared for long/short signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverParams {
    pub fast: String,
    pub slow: String,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            fast: "ema".to_string(),
            slow: "sma-200".to_string(),
        }
    }
}

/// Parameters of every indicator computed for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// SMA periods; the first one is published as `sma`, the rest as
    /// `sma-<period>`.
    #[serde(default = "default_sma_periods")]
    pub sma_periods: Vec<usize>,

    #[serde(default = "default_ema_period")]
    pub ema_period: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default)]
    pub macd: MacdParams,

    #[serde(default)]
    pub bollinger: BollingerParams,

    #[serde(default)]
    pub stoch_rsi: StochRsiParams,

    /// `None` disables signal fields entirely.
    #[serde(default = "default_crossover")]
    pub crossover: Option<CrossoverParams>,
}

fn default_crossover() -> Option<CrossoverParams> {
    Some(CrossoverParams::default())
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_periods: default_sma_periods(),
            ema_period: default_ema_period(),
            rsi_period: default_rsi_period(),
            macd: MacdParams::default(),
            bollinger: BollingerParams::default(),
            stoch_rsi: StochRsiParams::default(),
            crossover: default_crossover(),
        }
    }
}

impl IndicatorConfig {
    /// Reject parameters no indicator can work with.
    pub fn validate(&self) -> Result<()> {
        if self.sma_periods.is_empty() {
            bail!("sma_periods must list at least one period");
        }
        let periods = self
            .sma_periods
            .iter()
            .copied()
            .chain([
                self.ema_period,
                self.rsi_period,
                self.macd.fast,
                self.macd.slow,
                self.macd.signal,
                self.bollinger.period,
                self.stoch_rsi.rsi_period,
                self.stoch_rsi.k_period,
                self.stoch_rsi.d_period,
            ]);
        for period in periods {
            if period == 0 {
                bail!("indicator periods must be at least 1");
            }
        }
        if self.macd.fast >= self.macd.slow {
            bail!(
                "macd.fast ({}) must be shorter than macd.slow ({})",
                self.macd.fast,
                self.macd.slow
            );
        }
        if !self.bollinger.num_std.is_finite() || self.bollinger.num_std < 0.0 {
            bail!("bollinger.num_std must be a finite, non-negative number");
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the indicator service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- HTTP front end ------------------------------------------------------

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Origin allowed by CORS; `*` allows any.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Base assets listed by `GET /assets`.
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,

    /// Appended to the asset path segment to form the exchange symbol.
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,

    // --- Upstream market data -----------------------------------------------

    #[serde(default = "default_binance_base_url")]
    pub binance_base_url: String,

    /// Number of most recent klines requested per query.
    #[serde(default = "default_request_limit")]
    pub request_limit: u32,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    // --- Indicators ---------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origin: default_allowed_origin(),
            assets: default_assets(),
            quote_asset: default_quote_asset(),
            binance_base_url: default_binance_base_url(),
            request_limit: default_request_limit(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            request_limit = config.request_limit,
            assets = ?config.assets,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `TA_*` / `BINANCE_BASE_URL` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(addr) = lookup("TA_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(limit) = lookup("TA_REQUEST_LIMIT") {
            self.request_limit = limit
                .trim()
                .parse()
                .with_context(|| format!("TA_REQUEST_LIMIT '{limit}' is not a number"))?;
        }
        if let Some(origin) = lookup("TA_ALLOWED_ORIGIN") {
            self.allowed_origin = origin;
        }
        if let Some(assets) = lookup("TA_ASSETS") {
            self.assets = assets
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(url) = lookup("BINANCE_BASE_URL") {
            self.binance_base_url = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_limit == 0 || self.request_limit > MAX_REQUEST_LIMIT {
            bail!(
                "request_limit must be within 1..={MAX_REQUEST_LIMIT}, got {}",
                self.request_limit
            );
        }
        if self.quote_asset.is_empty() {
            bail!("quote_asset must not be empty");
        }
        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be at least 1");
        }
        self.indicators.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.request_limit, 600);
        assert_eq!(cfg.quote_asset, "USDT");
        assert_eq!(cfg.assets[0], "BTC");
        assert_eq!(cfg.indicators.sma_periods, vec![200]);
        assert_eq!(cfg.indicators.ema_period, 50);
        assert_eq!(cfg.indicators.rsi_period, 14);
        assert_eq!(cfg.indicators.macd, MacdParams { fast: 12, slow: 26, signal: 9 });
        assert_eq!(cfg.indicators.bollinger.period, 20);
        assert!((cfg.indicators.bollinger.num_std - 2.0).abs() < f64::EPSILON);
        assert_eq!(
            cfg.indicators.stoch_rsi,
            StochRsiParams { rsi_period: 14, k_period: 14, d_period: 3 }
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RuntimeConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "request_limit": 1000,
            "indicators": { "sma_periods": [50, 200], "macd": { "signal": 5 } }
        }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.request_limit, 1000);
        assert_eq!(cfg.indicators.sma_periods, vec![50, 200]);
        assert_eq!(cfg.indicators.macd, MacdParams { fast: 12, slow: 26, signal: 5 });
        assert_eq!(cfg.indicators.ema_period, 50);
        assert!(cfg.indicators.crossover.is_some());
    }

    #[test]
    fn crossover_can_be_disabled() {
        let cfg: IndicatorConfig = serde_json::from_str(r#"{ "crossover": null }"#).unwrap();
        assert!(cfg.crossover.is_none());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = RuntimeConfig::default();
        cfg.request_limit = 1001;
        assert!(cfg.validate().is_err());

        let mut cfg = RuntimeConfig::default();
        cfg.indicators.rsi_period = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = RuntimeConfig::default();
        cfg.indicators.macd.fast = 30;
        assert!(cfg.validate().is_err());

        let mut cfg = RuntimeConfig::default();
        cfg.indicators.bollinger.num_std = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("TA_REQUEST_LIMIT", "800"),
            ("TA_ASSETS", "btc, eth,,doge"),
            ("TA_ALLOWED_ORIGIN", "*"),
        ]
        .into_iter()
        .collect();
        let mut cfg = RuntimeConfig::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.request_limit, 800);
        assert_eq!(cfg.assets, vec!["BTC", "ETH", "DOGE"]);
        assert_eq!(cfg.allowed_origin, "*");
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
    }

    #[test]
    fn bad_limit_override_is_an_error() {
        let mut cfg = RuntimeConfig::default();
        let err = cfg.apply_overrides(|k| (k == "TA_REQUEST_LIMIT").then(|| "lots".to_string()));
        assert!(err.is_err());
    }
}
