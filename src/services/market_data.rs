//! Market data provider interface and the built-in simulated feed.

use crate::models::market::Tick;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;

/// Upstream tick source. The engine has no opinion on where ticks come
/// from; callers deliver them sequentially.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Next observed trade or quote. `None` means the feed is
    /// exhausted and the runtime should stop.
    async fn next_tick(&mut self) -> Option<Tick>;

    fn is_connected(&self) -> bool;
}

/// Bounded random walk around the MNQ price area, one tick per second.
/// Lets the server run standalone without an upstream feed.
pub struct SimulatedMarketDataProvider {
    symbol: String,
    last_price: f64,
    interval: Duration,
}

impl SimulatedMarketDataProvider {
    pub const START_PRICE: f64 = 18_850.0;
    pub const FLOOR: f64 = 18_000.0;
    pub const CEILING: f64 = 19_500.0;

    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            last_price: Self::START_PRICE,
            interval: Duration::from_secs(1),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl MarketDataProvider for SimulatedMarketDataProvider {
    async fn next_tick(&mut self) -> Option<Tick> {
        tokio::time::sleep(self.interval).await;
        let step = rand::thread_rng().gen_range(-50.0..=50.0);
        self.last_price = (self.last_price + step).clamp(Self::FLOOR, Self::CEILING);
        Some(Tick::new(self.symbol.clone(), self.last_price, Utc::now()))
    }

    fn is_connected(&self) -> bool {
        true
    }
}
