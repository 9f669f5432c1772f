// =============================================================================
// Application State
// =============================================================================
//
// Shared by every request through `Arc<AppState>`.  Everything here is
// read-only after startup: the configuration and the market data source.
// Series, indicator sets and records are built per request and never stored.
// =============================================================================

use std::sync::Arc;

use crate::binance::MarketDataSource;
use crate::runtime_config::RuntimeConfig;

pub struct AppState {
    pub config: RuntimeConfig,
    pub source: Arc<dyn MarketDataSource>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, source: Arc<dyn MarketDataSource>) -> Self {
        Self { config, source }
    }
}
