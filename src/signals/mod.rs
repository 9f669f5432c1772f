// =============================================================================
// Signals Module
// =============================================================================
//
// Discrete trading signals derived from indicator series:
// - Strict crossover detection between a fast and a slow line (long / short)

pub mod crossover;

pub use crossover::{detect_crossovers, SignalSeries};
