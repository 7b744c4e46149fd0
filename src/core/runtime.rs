//! Engine runtime: the single owner task that drives ticks through the
//! engine and fans its output out to subscribers.

use crate::services::broadcast::{PriceUpdate, SignalBroadcaster, StreamMessage};
use crate::services::market_data::MarketDataProvider;
use crate::signals::SignalEngine;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

pub struct EngineRuntime {
    engine: Arc<RwLock<SignalEngine>>,
    provider: Box<dyn MarketDataProvider>,
    broadcaster: SignalBroadcaster,
}

impl EngineRuntime {
    pub fn new(
        engine: Arc<RwLock<SignalEngine>>,
        provider: Box<dyn MarketDataProvider>,
        broadcaster: SignalBroadcaster,
    ) -> Self {
        Self {
            engine,
            provider,
            broadcaster,
        }
    }

    /// Sequential tick loop. The engine is written only here; readers
    /// (the analysis endpoint) take the lock briefly for snapshots.
    pub async fn run(mut self) {
        self.forward_lifecycle_updates().await;

        info!("engine runtime started");
        while let Some(tick) = self.provider.next_tick().await {
            let result = {
                let mut engine = self.engine.write().await;
                engine.process_tick(&tick).await
            };

            match result {
                Ok(signals) => {
                    for signal in signals {
                        self.broadcaster.send(StreamMessage::Signal(signal));
                    }
                }
                Err(e) => {
                    // A fault is local to this tick; state is intact
                    // for the next one.
                    error!(error = %e, "tick processing failed, continuing");
                }
            }

            self.broadcaster.send(StreamMessage::PriceUpdate(PriceUpdate {
                symbol: tick.symbol.clone(),
                price: tick.price,
                timestamp: tick.timestamp,
            }));
        }
        info!("market data feed ended, runtime stopping");
    }

    /// Bridge lifecycle transitions from the tracker's channel onto the
    /// subscriber stream.
    async fn forward_lifecycle_updates(&self) {
        let mut updates = self.engine.read().await.tracker().subscribe();
        let broadcaster = self.broadcaster.clone();
        tokio::spawn(async move {
            loop {
                match updates.recv().await {
                    Ok(update) => broadcaster.send(StreamMessage::SignalUpdate(update)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "lifecycle update stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}
