//! Signal generation and lifecycle.

pub mod candles;
pub mod engine;
pub mod error;
pub mod lifecycle;

pub use candles::CandleAggregator;
pub use engine::SignalEngine;
pub use error::EngineError;
pub use lifecycle::{ConfirmationPolicy, LifecycleTracker, RandomConfirmation, SignalMap};
