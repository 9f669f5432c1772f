// =============================================================================
// Series Loader — raw kline rows to a time-ordered bar series
// =============================================================================
//
// Input rows use Binance's array-of-arrays kline format:
//   [0] openTime (ms), [1] open, [2] high, [3] low, [4] close, [5] volume,
//   [6..] ignored
//
// Prices arrive as decimal strings; numbers are accepted as well.  Row order
// is preserved; the upstream source already returns ascending open times.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Number of leading fields every row must carry.
const REQUIRED_FIELDS: usize = 6;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar.  `time` is the open time in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bars in time order, index 0 oldest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in bar order; the input of every indicator.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

impl From<Vec<Bar>> for Series {
    fn from(bars: Vec<Bar>) -> Self {
        Self { bars }
    }
}

/// A raw row that cannot be turned into a [`Bar`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("malformed row {index}: {reason}")]
    MalformedRow { index: usize, reason: String },
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Convert raw kline rows into a [`Series`], failing on the first row that is
/// not an array of at least six numeric fields.
pub fn load_rows(rows: &[Value]) -> Result<Series, LoadError> {
    let mut bars = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let bar = parse_row(row).map_err(|reason| LoadError::MalformedRow { index, reason })?;

        if let Some(prev) = bars.last().map(|b: &Bar| b.time) {
            if bar.time <= prev {
                warn!(index, prev, time = bar.time, "kline rows are not strictly ascending");
            }
        }
        bars.push(bar);
    }

    Ok(Series { bars })
}

fn parse_row(row: &Value) -> Result<Bar, String> {
    let fields = row.as_array().ok_or_else(|| "row is not an array".to_string())?;
    if fields.len() < REQUIRED_FIELDS {
        return Err(format!(
            "expected at least {REQUIRED_FIELDS} fields, got {}",
            fields.len()
        ));
    }

    let open_time_ms = parse_i64(&fields[0]).map_err(|e| format!("open time: {e}"))?;

    Ok(Bar {
        // Integer division truncates, matching whole-second chart timestamps.
        time: open_time_ms / 1000,
        open: parse_f64(&fields[1]).map_err(|e| format!("open: {e}"))?,
        high: parse_f64(&fields[2]).map_err(|e| format!("high: {e}"))?,
        low: parse_f64(&fields[3]).map_err(|e| format!("low: {e}"))?,
        close: parse_f64(&fields[4]).map_err(|e| format!("close: {e}"))?,
        volume: parse_f64(&fields[5]).map_err(|e| format!("volume: {e}"))?,
    })
}

/// Parse a JSON value that may be either an integer or an integer string.
fn parse_i64(val: &Value) -> Result<i64, String> {
    if let Some(n) = val.as_i64() {
        Ok(n)
    } else if let Some(s) = val.as_str() {
        s.trim()
            .parse::<i64>()
            .map_err(|_| format!("'{s}' is not an integer"))
    } else {
        Err(format!("expected integer, got {val}"))
    }
}

/// Parse a JSON value that may be either a string or a number into a finite
/// `f64`.
fn parse_f64(val: &Value) -> Result<f64, String> {
    let parsed = if let Some(s) = val.as_str() {
        s.trim()
            .parse::<f64>()
            .map_err(|_| format!("'{s}' is not a number"))?
    } else if let Some(n) = val.as_f64() {
        n
    } else {
        return Err(format!("expected string or number, got {val}"));
    };

    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("non-finite value {val}"))
    }
}
