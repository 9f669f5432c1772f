pub mod client;

pub use client::{BinanceClient, MarketDataSource};
