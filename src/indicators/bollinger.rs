// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the same window.

use super::sma::{sma_lookback, sma_values};
use super::{align_tail, ensure_len, ensure_period, IndicatorSeries, Result};

/// The three aligned Bollinger bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

/// Calculate Bollinger Bands over every full `period` window of `closes`.
///
/// - `upper`  = SMA + `num_std` * σ
/// - `middle` = SMA
/// - `lower`  = SMA - `num_std` * σ
///
/// Undefined before index `period - 1`.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Result<BollingerBands> {
    ensure_period(period)?;
    ensure_len(closes.len(), sma_lookback(period) + 1)?;

    let middle = sma_values(closes, period);
    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());

    for (window, &mean) in closes.windows(period).zip(&middle) {
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std_dev = variance.sqrt();
        upper.push(mean + num_std * std_dev);
        lower.push(mean - num_std * std_dev);
    }

    let len = closes.len();
    Ok(BollingerBands {
        upper: align_tail(upper, len),
        middle: align_tail(middle, len),
        lower: align_tail(lower, len),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!(bb.middle[..19].iter().all(Option::is_none));
        let (u, m, l) = (bb.upper[19].unwrap(), bb.middle[19].unwrap(), bb.lower[19].unwrap());
        assert_eq!(m, 10.5);
        // population σ of 1..=20 = sqrt((20² - 1) / 12)
        let sigma = (399.0_f64 / 12.0).sqrt();
        assert!((u - (10.5 + 2.0 * sigma)).abs() < 1e-10);
        assert!((l - (10.5 - 2.0 * sigma)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(calculate_bollinger(&closes, 20, 2.0).is_err());
    }

    #[test]
    fn bollinger_flat() {
        let closes = vec![100.0; 25];
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        for i in 19..25 {
            assert_eq!(bb.upper[i], Some(100.0));
            assert_eq!(bb.lower[i], Some(100.0));
        }
    }

    #[test]
    fn bands_are_ordered() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 50.0 + (i as f64 * 0.7).cos() * 8.0 + (i % 7) as f64)
            .collect();
        for k in [0.0, 0.5, 2.0, 3.0] {
            let bb = calculate_bollinger(&closes, 20, k).unwrap();
            for i in 19..closes.len() {
                let (u, m, l) = (bb.upper[i].unwrap(), bb.middle[i].unwrap(), bb.lower[i].unwrap());
                assert!(u >= m && m >= l, "k={k} i={i}: {u} {m} {l}");
            }
        }
    }
}
