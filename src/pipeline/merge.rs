// =============================================================================
// Alignment & Merge — one output record per bar
// =============================================================================
//
// Single-valued indicators are emitted wherever they are defined.  MACD,
// Bollinger and StochRSI are emitted as whole groups: a bar carries either
// every field of the group or none of them.

use std::collections::BTreeMap;

use serde::Serialize;

use super::indicator_set::{
    IndicatorSet, BBANDS_HIGHER, BBANDS_LOWER, BBANDS_SMA, EMA, MACD_HIST, MACD_MACD,
    MACD_SIGNAL, RSI, STOCHRSI_FAST, STOCHRSI_SLOW,
};
use crate::market_data::Series;
use crate::signals::SignalSeries;

/// Merged bar + indicator + signal projection sent to the client.
///
/// Field order is the JSON key order; undefined fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,

    #[serde(rename = "macd-macd", skip_serializing_if = "Option::is_none")]
    pub macd_macd: Option<f64>,
    #[serde(rename = "macd-signal", skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(rename = "macd-hist", skip_serializing_if = "Option::is_none")]
    pub macd_hist: Option<f64>,

    #[serde(rename = "bbands-lower", skip_serializing_if = "Option::is_none")]
    pub bbands_lower: Option<f64>,
    #[serde(rename = "bbands-sma", skip_serializing_if = "Option::is_none")]
    pub bbands_sma: Option<f64>,
    #[serde(rename = "bbands-higher", skip_serializing_if = "Option::is_none")]
    pub bbands_higher: Option<f64>,

    #[serde(rename = "stochrsi-slow", skip_serializing_if = "Option::is_none")]
    pub stochrsi_slow: Option<f64>,
    #[serde(rename = "stochrsi-fast", skip_serializing_if = "Option::is_none")]
    pub stochrsi_fast: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<bool>,

    /// Additional SMA periods keyed `sma-<period>`.
    #[serde(flatten)]
    pub extra_sma: BTreeMap<String, f64>,
}

/// Merge bars, indicators and optional signals into per-bar records, in bar
/// order.
pub fn merge(
    series: &Series,
    indicators: &IndicatorSet,
    signals: Option<&SignalSeries>,
) -> Vec<OutputRecord> {
    let primary_sma = indicators.primary_sma();
    let extra_sma_names: Vec<&str> = indicators
        .names()
        .filter(|n| n.starts_with("sma-") && Some(*n) != primary_sma)
        .collect();

    series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let macd = indicators.group_at([MACD_MACD, MACD_SIGNAL, MACD_HIST], i);
            let bbands = indicators.group_at([BBANDS_LOWER, BBANDS_SMA, BBANDS_HIGHER], i);
            let srsi = indicators.group_at([STOCHRSI_SLOW, STOCHRSI_FAST], i);
            let crossover = signals.and_then(|s| s.get(i).copied().flatten());

            OutputRecord {
                time: bar.time,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                sma: primary_sma.and_then(|name| indicators.value_at(name, i)),
                ema: indicators.value_at(EMA, i),
                rsi: indicators.value_at(RSI, i),
                macd_macd: macd.map(|g| g[0]),
                macd_signal: macd.map(|g| g[1]),
                macd_hist: macd.map(|g| g[2]),
                bbands_lower: bbands.map(|g| g[0]),
                bbands_sma: bbands.map(|g| g[1]),
                bbands_higher: bbands.map(|g| g[2]),
                stochrsi_slow: srsi.map(|g| g[0]),
                stochrsi_fast: srsi.map(|g| g[1]),
                long: crossover.map(|c| c.long),
                short: crossover.map(|c| c.short),
                extra_sma: extra_sma_names
                    .iter()
                    .filter_map(|name| Some((name.to_string(), indicators.value_at(name, i)?)))
                    .collect(),
            }
        })
        .collect()
}
