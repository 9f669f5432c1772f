// =============================================================================
// Crossover Signals — fast line vs slow line
// =============================================================================
//
// A `long` fires on the bar where the fast line moves from at-or-below the
// slow line to strictly above it; a `short` fires on the mirror transition.
// Equality on both bars never fires, but passing through equality does.

use crate::indicators::{IndicatorError, Result};

/// Signal flags for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crossover {
    pub long: bool,
    pub short: bool,
}

/// Per-bar signals aligned with the bar series.  `None` where the fast or
/// slow value is missing on the current or previous bar (always at index 0).
pub type SignalSeries = Vec<Option<Crossover>>;

/// Detect strict crossovers between `fast` and `slow`.
pub fn detect_crossovers(fast: &[Option<f64>], slow: &[Option<f64>]) -> Result<SignalSeries> {
    if fast.len() != slow.len() {
        return Err(IndicatorError::LengthMismatch {
            left: fast.len(),
            right: slow.len(),
        });
    }

    let mut signals = Vec::with_capacity(fast.len());
    for i in 0..fast.len() {
        if i == 0 {
            signals.push(None);
            continue;
        }
        let flags = match (fast[i - 1], slow[i - 1], fast[i], slow[i]) {
            (Some(pf), Some(ps), Some(f), Some(s)) => Some(Crossover {
                long: f > s && pf <= ps,
                short: f < s && pf >= ps,
            }),
            _ => None,
        };
        signals.push(flags);
    }
    Ok(signals)
}
