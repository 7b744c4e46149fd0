//! EMA (Exponential Moving Average) indicator

/// Exponential moving average of `series` for `period`.
///
/// Degrades gracefully on short history: a series shorter than the
/// period yields its arithmetic mean (an empty series yields 0.0)
/// rather than an error, so callers can evaluate during warmup.
/// Otherwise seeds with the SMA of the first `period` values and
/// applies the standard recursive smoothing with `k = 2 / (period + 1)`
/// over the remainder, returning the final smoothed value.
pub fn ema(series: &[f64], period: usize) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let period = period.max(1);
    if series.len() < period {
        return series.iter().sum::<f64>() / series.len() as f64;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut value = series[..period].iter().sum::<f64>() / period as f64;
    for price in &series[period..] {
        value = price * k + value * (1.0 - k);
    }
    value
}
