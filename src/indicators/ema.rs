// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The very first EMA value (index `period - 1`) is seeded with the SMA of the
// first `period` closes.
// =============================================================================

use super::{align_tail, ensure_len, ensure_period, IndicatorSeries, Result};

/// Index of the first defined EMA value.
pub const fn ema_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Dense EMA values for `values`, starting at index `period - 1`.
///
/// Returns an empty `Vec` when the input is too short or the period is zero.
/// Shared with MACD, which smooths the (already dense) MACD line.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        let ema = (value - prev) * multiplier + prev;
        result.push(ema);
        prev = ema;
    }

    result
}

/// Compute the EMA series for `closes` aligned with the input.
///
/// # Errors
/// - `period == 0` => `InvalidPeriod`
/// - `closes.len() < period` => `InsufficientData`
pub fn calculate_ema(closes: &[f64], period: usize) -> Result<IndicatorSeries> {
    ensure_period(period)?;
    ensure_len(closes.len(), ema_lookback(period) + 1)?;
    Ok(align_tail(ema_values(closes, period), closes.len()))
}
