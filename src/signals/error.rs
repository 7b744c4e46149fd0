//! Engine error types.

use thiserror::Error;

/// Faults local to a single tick's processing. The caller is expected
/// to log and continue; engine state stays consistent for the next
/// tick because history is committed before indicator evaluation and
/// evaluation works on read-only snapshots.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Indicator arithmetic produced a NaN or infinity from the candle
    /// history. Distinguishable from the normal "no signal" outcome.
    #[error("non-finite {quantity} computed from candle history")]
    NonFinite { quantity: &'static str },
}
