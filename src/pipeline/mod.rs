// =============================================================================
// Indicator Pipeline
// =============================================================================
//
// raw kline rows -> Series -> IndicatorSet -> crossover signals -> records
//
// `run` is synchronous and touches nothing but its arguments, so concurrent
// requests never share state.  `gather_for_client` adds the upstream fetch in
// front of it.

pub mod indicator_set;
pub mod merge;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::binance::client::MarketDataSource;
use crate::market_data::{load_rows, LoadError};
use crate::runtime_config::IndicatorConfig;
use crate::signals::detect_crossovers;
use crate::types::AssetQuery;

pub use indicator_set::IndicatorSet;
pub use merge::{merge, OutputRecord};

/// Request-level failures.  Per-indicator problems never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The upstream rows could not be parsed into bars.
    #[error(transparent)]
    MalformedRow(#[from] LoadError),

    /// Upstream returned nothing usable (error, unknown symbol, empty list).
    #[error("no market data available")]
    NoData,

    /// The compute task did not complete.
    #[error("indicator computation aborted: {0}")]
    Aborted(String),
}

/// Turn raw rows into merged output records.
pub fn run(rows: &[Value], config: &IndicatorConfig) -> Result<Vec<OutputRecord>, PipelineError> {
    let series = load_rows(rows)?;
    if series.is_empty() {
        return Err(PipelineError::NoData);
    }
    debug!(bars = series.len(), "series loaded");

    let closes = series.closes();
    let indicators = IndicatorSet::compute(&closes, config);

    let signals = config.crossover.as_ref().and_then(|pair| {
        match (indicators.get(&pair.fast), indicators.get(&pair.slow)) {
            (Some(fast), Some(slow)) => match detect_crossovers(fast, slow) {
                Ok(signals) => Some(signals),
                Err(e) => {
                    warn!(error = %e, "crossover signals omitted");
                    None
                }
            },
            _ => {
                debug!(fast = %pair.fast, slow = %pair.slow, "crossover inputs unavailable");
                None
            }
        }
    });

    Ok(merge(&series, &indicators, signals.as_ref()))
}

/// Fetch the latest klines for `query` and run the pipeline over them.
///
/// Any upstream failure, as well as an empty payload, becomes
/// [`PipelineError::NoData`].
pub async fn gather_for_client(
    source: &dyn MarketDataSource,
    query: &AssetQuery,
    limit: u32,
    config: &IndicatorConfig,
) -> Result<Vec<OutputRecord>, PipelineError> {
    let rows = match source.fetch_klines(&query.symbol, &query.interval, limit).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(symbol = %query.symbol, interval = %query.interval, error = %e, "kline fetch failed");
            return Err(PipelineError::NoData);
        }
    };
    if rows.is_empty() {
        info!(symbol = %query.symbol, interval = %query.interval, "upstream returned no klines");
        return Err(PipelineError::NoData);
    }

    let config = config.clone();
    let records = tokio::task::spawn_blocking(move || run(&rows, &config))
        .await
        .map_err(|e| PipelineError::Aborted(e.to_string()))??;

    debug!(symbol = %query.symbol, count = records.len(), "records composed");
    Ok(records)
}
