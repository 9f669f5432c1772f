pub mod loader;

// Re-export the bar types for convenient access (e.g. `use crate::market_data::Series`).
pub use loader::{load_rows, LoadError, Series};
