//! Shared data models spanning the engine layers.

pub mod analysis;
pub mod market;
pub mod signal;

pub use analysis::{AnalysisSnapshot, Trend};
pub use market::{Candle, Tick};
pub use signal::{
    Killzone, SignalDirection, SignalStatus, SignalUpdate, TradingSignal, TP_MODES,
};
