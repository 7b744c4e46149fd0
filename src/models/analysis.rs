//! Read-only analysis snapshot returned by the engine.

use crate::models::signal::Killzone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

/// Snapshot of current indicator values and engine status. Purely
/// derived; taking one never mutates engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisSnapshot {
    /// Not enough closed candles for the slow EMA yet. A normal state
    /// during warmup, not an error.
    InsufficientData { message: String },
    Active {
        current_price: f64,
        fast_ema: f64,
        slow_ema: f64,
        atr: f64,
        trend: Trend,
        /// In-flight signals across all statuses.
        active_signals: usize,
        killzone: Killzone,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_signal: Option<DateTime<Utc>>,
    },
}
