// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The first RSI value lands on index `period` (the close that completes the
// first `period` deltas).
// =============================================================================

use super::{align_tail, ensure_len, ensure_period, IndicatorSeries, Result};

/// Index of the first defined RSI value.
pub const fn rsi_lookback(period: usize) -> usize {
    period
}

/// Dense RSI values starting at index `period`.
pub(crate) fn rsi_values(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    // --- Compute price deltas ------------------------------------------------
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // --- Seed averages with SMA of first `period` deltas ---------------------
    let (sum_gain, sum_loss) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l + d.abs())
            }
        });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = Vec::with_capacity(deltas.len() - period + 1);
    result.push(rsi_from_averages(avg_gain, avg_loss));

    // --- Wilder's smoothing for subsequent values ----------------------------
    for &delta in &deltas[period..] {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Compute the RSI series for `closes` aligned with the input.
///
/// # Errors
/// - `period == 0` => `InvalidPeriod`
/// - `closes.len() < period + 1` => `InsufficientData` (need `period` deltas)
pub fn calculate_rsi(closes: &[f64], period: usize) -> Result<IndicatorSeries> {
    ensure_period(period)?;
    ensure_len(closes.len(), rsi_lookback(period) + 1)?;
    Ok(align_tail(rsi_values(closes, period), closes.len()))
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// A zero average loss is not an error: RS is taken as 0 when there was no
/// movement at all (RSI = 0), and RSI is pinned to 100 when there were gains
/// but no losses.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorError;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_err());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(matches!(
            calculate_rsi(&[1.0, 2.0, 3.0], 0),
            Err(IndicatorError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn rsi_insufficient_data() {
        // Need period+1 closes (period deltas). 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert_eq!(
            calculate_rsi(&closes, 14),
            Err(IndicatorError::InsufficientData {
                required: 15,
                actual: 14
            })
        );
    }

    #[test]
    fn rsi_first_value_at_period() {
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14).unwrap();
        assert_eq!(rsi.len(), 15);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert!(rsi[14].is_some());
    }

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending prices => RSI should be 100.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14).unwrap();
        for &v in rsi.iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        // Strictly descending prices => RSI should be 0.
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14).unwrap();
        for &v in rsi.iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_uses_zero_rs() {
        let closes = vec![100.0; 30];
        let rsi = calculate_rsi(&closes, 14).unwrap();
        assert_eq!(rsi.iter().flatten().count(), 16);
        for &v in rsi.iter().flatten() {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn rsi_range_check() {
        // Arbitrary data: RSI must always be in [0, 100].
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13, 46.2, 41.0,
            39.5, 47.75, 47.1, 44.0,
        ];
        let rsi = calculate_rsi(&closes, 14).unwrap();
        for &v in rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_known_seed_value() {
        // period 2: deltas +2, -1 => avg_gain 1.0, avg_loss 0.5, RS 2 => 66.67
        let rsi = calculate_rsi(&[10.0, 12.0, 11.0], 2).unwrap();
        let v = rsi[2].unwrap();
        assert!((v - 200.0 / 3.0).abs() < 1e-10, "got {v}");
    }
}
