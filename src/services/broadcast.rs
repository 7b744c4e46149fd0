//! Fan-out of engine output to websocket subscribers.

use crate::models::signal::{SignalUpdate, TradingSignal};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

/// Wire envelope for everything pushed to subscribers. Serializes as
/// `{"type": ..., "payload": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum StreamMessage {
    Connection(ConnectionInfo),
    Signal(TradingSignal),
    SignalUpdate(SignalUpdate),
    PriceUpdate(PriceUpdate),
}

/// Greeting sent once per websocket connection.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionInfo {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub server: String,
}

impl ConnectionInfo {
    pub fn connected() -> Self {
        Self {
            status: "connected".to_string(),
            timestamp: Utc::now(),
            server: "orionis".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceUpdate {
    pub symbol: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Thin wrapper over a tokio broadcast channel; sending with no
/// subscribers is fine and simply drops the message.
#[derive(Clone)]
pub struct SignalBroadcaster {
    tx: broadcast::Sender<StreamMessage>,
}

impl SignalBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StreamMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn send(&self, message: StreamMessage) {
        let _ = self.tx.send(message);
    }
}
