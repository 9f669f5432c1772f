// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_i = (close_{i-period+1} + ... + close_i) / period
//
// Defined from index `period - 1` onwards.  Each window is summed directly
// rather than with a running sum so that every value is the exact arithmetic
// mean of its window.

use super::{align_tail, ensure_len, ensure_period, IndicatorSeries, Result};

/// Index of the first defined SMA value.
pub const fn sma_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Dense SMA values, one per full window (`closes.len() - period + 1` items).
pub(crate) fn sma_values(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }
    let divisor = period as f64;
    closes
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / divisor)
        .collect()
}

/// Compute the SMA series for `closes` aligned with the input.
pub fn calculate_sma(closes: &[f64], period: usize) -> Result<IndicatorSeries> {
    ensure_period(period)?;
    ensure_len(closes.len(), sma_lookback(period) + 1)?;
    Ok(align_tail(sma_values(closes, period), closes.len()))
}
