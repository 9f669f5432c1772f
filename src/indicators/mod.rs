// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators served to the
// chart client.  Every public function takes a closing-price slice and returns
// an `IndicatorSeries` aligned 1:1 with its input: position `i` is `None`
// during warm-up and `Some(v)` once enough history exists.
//
// Functions return `Result` so the caller can drop an indicator that cannot be
// computed (zero period, too few bars) without aborting the whole request.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stoch_rsi;

use thiserror::Error;

pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stoch_rsi::calculate_stoch_rsi;

/// Indicator output aligned with the input closes; `None` marks an undefined
/// position.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Why an indicator could not be produced for a series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// A look-back parameter is unusable.
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod { period: usize, reason: &'static str },

    /// Fewer closes than the indicator's minimum warm-up.
    #[error("insufficient data: required {required} closes, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Two series that must be positionally aligned have different lengths.
    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

pub type Result<T> = std::result::Result<T, IndicatorError>;

// =============================================================================
// Shared helpers
// =============================================================================

pub(crate) fn ensure_period(period: usize) -> Result<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod {
            period,
            reason: "period must be at least 1",
        });
    }
    Ok(())
}

pub(crate) fn ensure_len(actual: usize, required: usize) -> Result<()> {
    if actual < required {
        return Err(IndicatorError::InsufficientData { required, actual });
    }
    Ok(())
}

/// Place a dense run of values at the tail of a series of length `len`,
/// leaving the leading positions undefined.
pub(crate) fn align_tail(values: Vec<f64>, len: usize) -> IndicatorSeries {
    debug_assert!(values.len() <= len);
    let mut out = vec![None; len - values.len()];
    out.extend(values.into_iter().map(Some));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_tail_pads_front() {
        let s = align_tail(vec![1.0, 2.0], 4);
        assert_eq!(s, vec![None, None, Some(1.0), Some(2.0)]);
    }

    #[test]
    fn error_messages() {
        let err = IndicatorError::InsufficientData {
            required: 15,
            actual: 10,
        };
        assert_eq!(err.to_string(), "insufficient data: required 15 closes, got 10");
        assert!(ensure_period(0).is_err());
        assert!(ensure_len(3, 3).is_ok());
    }
}
