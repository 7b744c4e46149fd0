//! Pure indicator math over numeric series. No state, no side effects.

pub mod trend;
pub mod volatility;

pub use trend::ema;
pub use volatility::atr;
