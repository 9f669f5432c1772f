// =============================================================================
// Stochastic RSI
// =============================================================================
//
// Applies the stochastic oscillator to RSI instead of price:
//
//   %K = (RSI - min(RSI, k)) / (max(RSI, k) - min(RSI, k))
//   %D = SMA(%K, d)
//
// %K is a fraction in [0, 1].  A window whose RSI range is zero yields 0.

use super::rsi::{rsi_lookback, rsi_values};
use super::sma::sma_values;
use super::{align_tail, ensure_len, ensure_period, IndicatorSeries, Result};

/// %K (fast) and %D (slow) lines, aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct StochRsiSeries {
    pub k: IndicatorSeries,
    pub d: IndicatorSeries,
}

/// Index of the first defined %K value.
pub const fn stoch_rsi_k_lookback(rsi_period: usize, k_period: usize) -> usize {
    rsi_lookback(rsi_period) + k_period.saturating_sub(1)
}

/// Index of the first defined %D value.
pub const fn stoch_rsi_d_lookback(rsi_period: usize, k_period: usize, d_period: usize) -> usize {
    stoch_rsi_k_lookback(rsi_period, k_period) + d_period.saturating_sub(1)
}

/// Compute Stochastic RSI with independent RSI, %K and %D periods.
///
/// # Errors
/// - any period zero => `InvalidPeriod`
/// - fewer than `rsi_period + k_period + d_period - 1` closes => `InsufficientData`
pub fn calculate_stoch_rsi(
    closes: &[f64],
    rsi_period: usize,
    k_period: usize,
    d_period: usize,
) -> Result<StochRsiSeries> {
    ensure_period(rsi_period)?;
    ensure_period(k_period)?;
    ensure_period(d_period)?;
    ensure_len(
        closes.len(),
        stoch_rsi_d_lookback(rsi_period, k_period, d_period) + 1,
    )?;

    let rsi = rsi_values(closes, rsi_period);
    let k: Vec<f64> = rsi
        .windows(k_period)
        .map(|w| {
            let (lo, hi) = w
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let current = w[w.len() - 1];
            if hi > lo {
                (current - lo) / (hi - lo)
            } else {
                0.0
            }
        })
        .collect();
    let d = sma_values(&k, d_period);

    let len = closes.len();
    Ok(StochRsiSeries {
        k: align_tail(k, len),
        d: align_tail(d, len),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{calculate_rsi, IndicatorError};

    fn choppy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 200.0 + (i as f64 * 0.45).sin() * 12.0 + (i as f64 * 1.3).cos() * 4.0)
            .collect()
    }

    #[test]
    fn warmup_boundaries() {
        let closes = choppy(60);
        let s = calculate_stoch_rsi(&closes, 14, 14, 3).unwrap();
        let k_lb = stoch_rsi_k_lookback(14, 14);
        let d_lb = stoch_rsi_d_lookback(14, 14, 3);
        assert_eq!((k_lb, d_lb), (27, 29));
        assert!(s.k[..k_lb].iter().all(Option::is_none));
        assert!(s.k[k_lb..].iter().all(Option::is_some));
        assert!(s.d[..d_lb].iter().all(Option::is_none));
        assert!(s.d[d_lb..].iter().all(Option::is_some));
    }

    #[test]
    fn k_is_position_within_rsi_range() {
        let closes = choppy(80);
        let s = calculate_stoch_rsi(&closes, 14, 5, 3).unwrap();
        let rsi = calculate_rsi(&closes, 14).unwrap();
        let i = 40;
        let window: Vec<f64> = (i - 4..=i).map(|j| rsi[j].unwrap()).collect();
        let lo = window.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let expected = (rsi[i].unwrap() - lo) / (hi - lo);
        assert!((s.k[i].unwrap() - expected).abs() < 1e-12);
        for v in s.k.iter().flatten() {
            assert!((0.0..=1.0).contains(v));
        }
    }

    #[test]
    fn d_is_mean_of_k() {
        let closes = choppy(80);
        let s = calculate_stoch_rsi(&closes, 14, 14, 3).unwrap();
        let i = 50;
        let expected = (s.k[i - 2].unwrap() + s.k[i - 1].unwrap() + s.k[i].unwrap()) / 3.0;
        assert!((s.d[i].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn flat_rsi_window_yields_zero() {
        // Monotonic rise pins RSI at 100 => zero range.
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let s = calculate_stoch_rsi(&closes, 14, 5, 3).unwrap();
        for v in s.k.iter().flatten() {
            assert_eq!(*v, 0.0);
        }
    }

    #[test]
    fn insufficient_data() {
        assert_eq!(
            calculate_stoch_rsi(&choppy(29), 14, 14, 3),
            Err(IndicatorError::InsufficientData {
                required: 30,
                actual: 29
            })
        );
    }
}
