// =============================================================================
// Binance REST Market Data — public klines endpoint
// =============================================================================
//
// Only the unsigned market-data endpoint is used, so no API key or secret is
// configured.  The request timeout bounds the only blocking step of a query.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use tracing::{debug, instrument};

/// Source of raw candlestick rows.
///
/// Implementations return up to `limit` of the most recent rows for
/// `symbol` / `interval` in ascending time order, each row in Binance's
/// array format (`[openTimeMs, open, high, low, close, volume, ...]`).
pub trait MarketDataSource: Send + Sync {
    fn fetch_klines<'a>(
        &'a self,
        symbol: &'a str,
        interval: &'a str,
        limit: u32,
    ) -> BoxFuture<'a, Result<Vec<Value>>>;
}

/// Binance public REST API client.
#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    /// Create a new `BinanceClient` against `base_url`
    /// (e.g. `https://api.binance.com`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "BinanceClient initialised");

        Ok(Self { base_url, client })
    }

    fn klines_url(&self, symbol: &str, interval: &str, limit: u32) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, interval, limit
        )
    }

    /// GET /api/v3/klines (public, unsigned).
    ///
    /// Returns the raw rows; the series loader turns them into bars.
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Value>> {
        let url = self.klines_url(symbol, interval, limit);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .context("failed to parse klines response")?;

        if !status.is_success() {
            anyhow::bail!("Binance GET /api/v3/klines returned {}: {}", status, body);
        }

        let rows = match body {
            Value::Array(rows) => rows,
            other => anyhow::bail!("klines response is not an array: {other}"),
        };

        debug!(symbol, interval, count = rows.len(), "klines fetched");
        Ok(rows)
    }
}

impl MarketDataSource for BinanceClient {
    fn fetch_klines<'a>(
        &'a self,
        symbol: &'a str,
        interval: &'a str,
        limit: u32,
    ) -> BoxFuture<'a, Result<Vec<Value>>> {
        self.get_klines(symbol, interval, limit).boxed()
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
