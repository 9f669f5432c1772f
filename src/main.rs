// =============================================================================
// TA Signal Server — Main Entry Point
// =============================================================================
//
// Serves technical indicators (SMA, EMA, RSI, MACD, Bollinger, StochRSI) and
// crossover signals over the latest Binance klines of a USDT pair.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod binance;
mod indicators;
mod market_data;
mod pipeline;
mod runtime_config;
mod signals;
mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::binance::BinanceClient;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("TA Signal Server starting up");

    let config_path =
        std::env::var("TA_CONFIG").unwrap_or_else(|_| "runtime_config.json".into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides()?;
    config.validate().context("invalid runtime configuration")?;
    for key in pipeline::indicator_set::unreachable_crossover_keys(&config.indicators) {
        warn!(key = %key, "crossover input is never computed, long/short signals disabled");
    }

    info!(
        assets = ?config.assets,
        quote = %config.quote_asset,
        request_limit = config.request_limit,
        "Configured indicator service"
    );

    // ── 2. Market data source ────────────────────────────────────────────
    let client = BinanceClient::new(
        config.binance_base_url.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    )?;

    // ── 3. API server ────────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, Arc::new(client)));
    let app = api::rest::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Shutdown signal received, stopping gracefully");
            }
        })
        .await
        .context("API server failed")?;

    info!("TA Signal Server shut down complete.");
    Ok(())
}
