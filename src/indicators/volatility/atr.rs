//! ATR (Average True Range) indicator

use crate::indicators::trend::ema;

/// Average true range over parallel high/low/close series.
///
/// Requires at least 2 closes and `period` highs/lows, else returns
/// 0.0. The true range at index `i >= 1` is
/// `max(high[i] - low[i], |high[i] - close[i-1]|, |low[i] - close[i-1]|)`;
/// the result is the EMA of the most recent `period` true ranges
/// (short true-range series fall back to their mean via `ema` itself).
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    if closes.len() < 2 || highs.len() < period || lows.len() < period {
        return 0.0;
    }

    let len = highs.len().min(lows.len()).min(closes.len());
    let mut true_ranges = Vec::with_capacity(len - 1);
    for i in 1..len {
        let tr = (highs[i] - lows[i])
            .max((highs[i] - closes[i - 1]).abs())
            .max((lows[i] - closes[i - 1]).abs());
        true_ranges.push(tr);
    }

    if true_ranges.len() < period {
        if true_ranges.is_empty() {
            return 0.0;
        }
        return true_ranges.iter().sum::<f64>() / true_ranges.len() as f64;
    }

    ema(&true_ranges[true_ranges.len() - period..], period)
}
