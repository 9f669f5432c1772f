// =============================================================================
// Indicator Set — every configured indicator over one close series
// =============================================================================
//
// Each indicator is computed independently from the same closes.  One that
// cannot be produced (too few bars, unusable period) is left out of the set;
// the merge stage then simply never emits its fields.

use std::collections::BTreeMap;

use tracing::debug;

use crate::indicators::{
    calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
    calculate_stoch_rsi, IndicatorSeries, Result,
};
use crate::runtime_config::IndicatorConfig;

pub const EMA: &str = "ema";
pub const RSI: &str = "rsi";
pub const MACD_MACD: &str = "macd-macd";
pub const MACD_SIGNAL: &str = "macd-signal";
pub const MACD_HIST: &str = "macd-hist";
pub const BBANDS_LOWER: &str = "bbands-lower";
pub const BBANDS_SMA: &str = "bbands-sma";
pub const BBANDS_HIGHER: &str = "bbands-higher";
pub const STOCHRSI_SLOW: &str = "stochrsi-slow";
pub const STOCHRSI_FAST: &str = "stochrsi-fast";

/// Set key of the SMA with the given period.
pub fn sma_key(period: usize) -> String {
    format!("sma-{period}")
}

/// Every key `IndicatorSet::compute` can insert under `config`, given enough
/// bars.
pub fn producible_keys(config: &IndicatorConfig) -> Vec<String> {
    let mut keys: Vec<String> = config.sma_periods.iter().map(|&p| sma_key(p)).collect();
    keys.extend(
        [
            EMA,
            RSI,
            MACD_MACD,
            MACD_SIGNAL,
            MACD_HIST,
            BBANDS_LOWER,
            BBANDS_SMA,
            BBANDS_HIGHER,
            STOCHRSI_SLOW,
            STOCHRSI_FAST,
        ]
        .map(String::from),
    );
    keys
}

/// Crossover inputs that no amount of history can produce under `config`.
pub fn unreachable_crossover_keys(config: &IndicatorConfig) -> Vec<String> {
    let Some(pair) = &config.crossover else {
        return Vec::new();
    };
    let keys = producible_keys(config);
    [&pair.fast, &pair.slow]
        .into_iter()
        .filter(|key| !keys.contains(key))
        .cloned()
        .collect()
}

/// Named indicator series, all aligned with the same bar series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    series: BTreeMap<String, IndicatorSeries>,
    primary_sma: Option<String>,
}

impl IndicatorSet {
    /// Compute every indicator named by `config` over `closes`.
    pub fn compute(closes: &[f64], config: &IndicatorConfig) -> Self {
        let mut set = Self {
            primary_sma: config.sma_periods.first().map(|&p| sma_key(p)),
            ..Self::default()
        };

        for &period in &config.sma_periods {
            set.record(sma_key(period), calculate_sma(closes, period));
        }
        set.record(EMA.to_string(), calculate_ema(closes, config.ema_period));
        set.record(RSI.to_string(), calculate_rsi(closes, config.rsi_period));

        let macd = &config.macd;
        match calculate_macd(closes, macd.fast, macd.slow, macd.signal) {
            Ok(m) => {
                set.insert(MACD_MACD, m.macd);
                set.insert(MACD_SIGNAL, m.signal);
                set.insert(MACD_HIST, m.histogram);
            }
            Err(e) => debug!(indicator = "macd", error = %e, "indicator omitted"),
        }

        let bb = &config.bollinger;
        match calculate_bollinger(closes, bb.period, bb.num_std) {
            Ok(b) => {
                set.insert(BBANDS_LOWER, b.lower);
                set.insert(BBANDS_SMA, b.middle);
                set.insert(BBANDS_HIGHER, b.upper);
            }
            Err(e) => debug!(indicator = "bbands", error = %e, "indicator omitted"),
        }

        let srsi = &config.stoch_rsi;
        match calculate_stoch_rsi(closes, srsi.rsi_period, srsi.k_period, srsi.d_period) {
            Ok(s) => {
                // Wire names follow TA-Lib's (fastk, fastd) unpacked as (slow, fast).
                set.insert(STOCHRSI_SLOW, s.k);
                set.insert(STOCHRSI_FAST, s.d);
            }
            Err(e) => debug!(indicator = "stochrsi", error = %e, "indicator omitted"),
        }

        set
    }

    fn record(&mut self, name: String, result: Result<IndicatorSeries>) {
        match result {
            Ok(series) => {
                self.series.insert(name, series);
            }
            Err(e) => debug!(indicator = %name, error = %e, "indicator omitted"),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, series: IndicatorSeries) {
        self.series.insert(name.into(), series);
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorSeries> {
        self.series.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Key of the SMA published under the plain `sma` field.
    pub fn primary_sma(&self) -> Option<&str> {
        self.primary_sma.as_deref()
    }

    /// Value of `name` at `index`, `None` when absent or undefined there.
    pub fn value_at(&self, name: &str, index: usize) -> Option<f64> {
        self.series.get(name)?.get(index).copied().flatten()
    }

    /// All values of a multi-output group at `index`, or `None` unless every
    /// member is defined there.
    pub fn group_at<const N: usize>(&self, names: [&str; N], index: usize) -> Option<[f64; N]> {
        let mut values = [0.0; N];
        for (slot, name) in values.iter_mut().zip(names) {
            *slot = self.value_at(name, index)?;
        }
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.2).sin() * 3.0).collect()
    }

    #[test]
    fn full_history_populates_every_indicator() {
        let set = IndicatorSet::compute(&closes(300), &IndicatorConfig::default());
        let names: Vec<&str> = set.names().collect();
        for expected in [
            "sma-200",
            EMA,
            RSI,
            MACD_MACD,
            MACD_SIGNAL,
            MACD_HIST,
            BBANDS_LOWER,
            BBANDS_SMA,
            BBANDS_HIGHER,
            STOCHRSI_SLOW,
            STOCHRSI_FAST,
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert_eq!(set.primary_sma(), Some("sma-200"));
        assert!(set.get(EMA).unwrap().len() == 300);
    }

    #[test]
    fn short_history_omits_long_indicators() {
        let set = IndicatorSet::compute(&closes(40), &IndicatorConfig::default());
        assert!(set.get("sma-200").is_none());
        assert!(set.get(EMA).is_none());
        assert!(set.get(RSI).is_some());
        assert!(set.get(MACD_MACD).is_some());
        assert!(set.get(BBANDS_SMA).is_some());
        assert!(set.get(STOCHRSI_FAST).is_some());
    }

    #[test]
    fn multiple_sma_periods_coexist() {
        let config = IndicatorConfig {
            sma_periods: vec![20, 50],
            ..IndicatorConfig::default()
        };
        let set = IndicatorSet::compute(&closes(60), &config);
        assert!(set.get("sma-20").is_some());
        assert!(set.get("sma-50").is_some());
        assert_eq!(set.primary_sma(), Some("sma-20"));
    }

    #[test]
    fn crossover_keys_are_checked_against_config() {
        assert!(unreachable_crossover_keys(&IndicatorConfig::default()).is_empty());

        let config = IndicatorConfig {
            sma_periods: vec![50],
            ..IndicatorConfig::default()
        };
        assert_eq!(unreachable_crossover_keys(&config), vec!["sma-200".to_string()]);

        let config = IndicatorConfig {
            crossover: None,
            ..config
        };
        assert!(unreachable_crossover_keys(&config).is_empty());
    }

    #[test]
    fn group_requires_every_member() {
        let mut set = IndicatorSet::default();
        set.insert("a", vec![Some(1.0), Some(2.0)]);
        set.insert("b", vec![None, Some(3.0)]);
        assert_eq!(set.group_at(["a", "b"], 0), None);
        assert_eq!(set.group_at(["a", "b"], 1), Some([2.0, 3.0]));
        assert_eq!(set.group_at(["a", "missing"], 1), None);
        assert_eq!(set.value_at("a", 9), None);
    }
}
