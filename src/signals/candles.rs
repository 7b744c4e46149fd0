//! Incremental one-minute candle aggregation from raw ticks.

use crate::models::market::Candle;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
struct OpenCandle {
    minute: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
}

/// Folds a tick stream into closed one-minute OHLC candles, keeping
/// only the in-progress candle plus bounded history windows (raw
/// prices, closes, highs, lows), oldest-first evicted at capacity.
#[derive(Debug)]
pub struct CandleAggregator {
    max_history: usize,
    current: Option<OpenCandle>,
    last_price: f64,
    prices: VecDeque<f64>,
    closes: VecDeque<f64>,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
}

impl CandleAggregator {
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            current: None,
            last_price: 0.0,
            prices: VecDeque::with_capacity(max_history + 1),
            closes: VecDeque::with_capacity(max_history + 1),
            highs: VecDeque::with_capacity(max_history + 1),
            lows: VecDeque::with_capacity(max_history + 1),
        }
    }

    /// Feed one tick. Returns the candle closed by a minute rollover,
    /// if any.
    ///
    /// The closing price is the last price seen before the rollover
    /// tick; the tick that advances the minute opens the next candle
    /// instead of mutating the one it closes.
    pub fn update(&mut self, price: f64, timestamp: DateTime<Utc>) -> Option<Candle> {
        let minute = truncate_to_minute(timestamp);

        let closed = match self.current.as_mut() {
            None => {
                self.current = Some(OpenCandle {
                    minute,
                    open: price,
                    high: price,
                    low: price,
                });
                None
            }
            Some(open) if open.minute == minute => {
                open.high = open.high.max(price);
                open.low = open.low.min(price);
                None
            }
            Some(open) => {
                let candle = Candle {
                    open: open.open,
                    high: open.high,
                    low: open.low,
                    close: self.last_price,
                    minute: open.minute,
                };
                self.closes.push_back(candle.close);
                self.highs.push_back(candle.high);
                self.lows.push_back(candle.low);
                *open = OpenCandle {
                    minute,
                    open: price,
                    high: price,
                    low: price,
                };
                Some(candle)
            }
        };

        self.prices.push_back(price);
        self.last_price = price;
        self.evict();
        closed
    }

    fn evict(&mut self) {
        let cap = self.max_history;
        for series in [
            &mut self.prices,
            &mut self.closes,
            &mut self.highs,
            &mut self.lows,
        ] {
            while series.len() > cap {
                series.pop_front();
            }
        }
    }

    /// Most recent raw tick price, if any tick has been seen.
    pub fn last_price(&self) -> Option<f64> {
        self.prices.back().copied()
    }

    /// Number of closed candles currently in the window.
    pub fn candle_count(&self) -> usize {
        self.closes.len()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.closes.iter().copied().collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.highs.iter().copied().collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.lows.iter().copied().collect()
    }

    pub fn price_count(&self) -> usize {
        self.prices.len()
    }

    /// Oldest close still in the window, for eviction checks.
    pub fn oldest_close(&self) -> Option<f64> {
        self.closes.front().copied()
    }
}

fn truncate_to_minute(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    let secs = timestamp.timestamp().div_euclid(60) * 60;
    DateTime::from_timestamp(secs, 0).unwrap_or(timestamp)
}
