//! Raw market data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed trade or quote. Transient: ticks are folded into
/// candles and the raw price window, never stored individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl Tick {
    pub fn new(symbol: impl Into<String>, price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            timestamp,
        }
    }
}

/// A closed one-minute OHLC candle. Immutable once emitted by the
/// aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Start of the minute this candle covers.
    pub minute: DateTime<Utc>,
}
