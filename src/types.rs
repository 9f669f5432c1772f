// =============================================================================
// Shared request types
// =============================================================================

use thiserror::Error;

/// Kline intervals the upstream exchange understands, after lowercasing.
pub const SUPPORTED_INTERVALS: &[&str] = &[
    "1s", "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w",
];

/// Timeframe used when the path omits one.
pub const DEFAULT_TIMEFRAME: &str = "1h";

/// Path parameters that cannot be turned into an upstream query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid asset '{0}': expected ASCII letters and digits")]
    InvalidAsset(String),
    #[error("unsupported timeframe '{0}'")]
    UnsupportedInterval(String),
}

/// Exchange symbol + kline interval for one indicator request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    pub symbol: String,
    pub interval: String,
}

impl AssetQuery {
    /// Build a query from the `/assets/:asset/:timeframe` path segments:
    /// symbol = asset + quote, interval = lowercase(timeframe).
    pub fn from_path(asset: &str, timeframe: &str, quote: &str) -> Result<Self, QueryError> {
        if asset.is_empty() || !asset.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(QueryError::InvalidAsset(asset.to_string()));
        }
        let interval = timeframe.to_lowercase();
        if !SUPPORTED_INTERVALS.contains(&interval.as_str()) {
            return Err(QueryError::UnsupportedInterval(timeframe.to_string()));
        }
        Ok(Self {
            symbol: format!("{asset}{quote}"),
            interval,
        })
    }
}

impl std::fmt::Display for AssetQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.interval)
    }
}
