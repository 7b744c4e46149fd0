//! Trend-following indicators.

pub mod ema;

pub use ema::ema;
