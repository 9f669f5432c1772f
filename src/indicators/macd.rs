// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   macd_line   = EMA(fast) - EMA(slow)
//   signal_line = EMA(signal) of macd_line
//   histogram   = macd_line - signal_line
//
// The MACD line exists from index `slow - 1`, the signal line from
// `slow + signal - 2`.  All three outputs are published together from the
// signal line's first index so a consumer never sees a partial triple.
// =============================================================================

use super::ema::ema_values;
use super::{align_tail, ensure_len, ensure_period, IndicatorError, IndicatorSeries, Result};

/// The three aligned MACD outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

/// Index of the first defined MACD triple.
pub const fn macd_lookback(slow: usize, signal: usize) -> usize {
    slow.saturating_sub(1) + signal.saturating_sub(1)
}

/// Compute MACD for `closes` with the given `fast`, `slow` and `signal`
/// periods.
///
/// # Errors
/// - any period zero, or `fast >= slow` => `InvalidPeriod`
/// - `closes.len() < slow + signal - 1` => `InsufficientData`
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdSeries> {
    ensure_period(fast)?;
    ensure_period(slow)?;
    ensure_period(signal)?;
    if fast >= slow {
        return Err(IndicatorError::InvalidPeriod {
            period: fast,
            reason: "fast period must be shorter than slow period",
        });
    }
    let lookback = macd_lookback(slow, signal);
    ensure_len(closes.len(), lookback + 1)?;

    let fast_ema = ema_values(closes, fast);
    let slow_ema = ema_values(closes, slow);

    // Both dense series end on the last close; drop the fast EMA's extra head.
    let skip = fast_ema.len() - slow_ema.len();
    let macd_line: Vec<f64> = fast_ema[skip..]
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema_values(&macd_line, signal);
    let macd_line = macd_line[macd_line.len() - signal_line.len()..].to_vec();
    let histogram: Vec<f64> = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    let len = closes.len();
    Ok(MacdSeries {
        macd: align_tail(macd_line, len),
        signal: align_tail(signal_line, len),
        histogram: align_tail(histogram, len),
    })
}
