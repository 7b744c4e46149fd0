//! Two-phase signal lifecycle: pending signals are resolved to a
//! terminal status by a pluggable confirmation policy.

use crate::models::signal::{SignalStatus, SignalUpdate, TradingSignal};
use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// In-flight signals shared between the engine and lifecycle tasks.
pub type SignalMap = Arc<RwLock<HashMap<Uuid, TradingSignal>>>;

/// Decides the terminal status for a pending signal. Implementations
/// may take as long as their confirmation source requires; the tracker
/// runs them on detached tasks, so `process_tick` never waits on one.
#[async_trait]
pub trait ConfirmationPolicy: Send + Sync {
    async fn resolve(&self, signal: &TradingSignal) -> SignalStatus;
}

/// Stand-in for an external confirmation source: waits a uniformly
/// random delay, then confirms with fixed probability. Not a real
/// validation signal; swap in a real policy via `ConfirmationPolicy`.
#[derive(Debug, Clone)]
pub struct RandomConfirmation {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub confirm_probability: f64,
}

impl Default for RandomConfirmation {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(120),
            confirm_probability: 0.7,
        }
    }
}

#[async_trait]
impl ConfirmationPolicy for RandomConfirmation {
    async fn resolve(&self, _signal: &TradingSignal) -> SignalStatus {
        // Draw before sleeping: ThreadRng must not be held across await.
        let (delay, confirmed) = {
            let mut rng = rand::thread_rng();
            let secs = rng.gen_range(self.min_delay.as_secs()..=self.max_delay.as_secs());
            (
                Duration::from_secs(secs),
                rng.gen_bool(self.confirm_probability),
            )
        };
        tokio::time::sleep(delay).await;
        if confirmed {
            SignalStatus::Confirmed
        } else {
            SignalStatus::Invalidated
        }
    }
}

/// Schedules one detached resolution task per tracked signal and
/// publishes the resulting transitions.
pub struct LifecycleTracker {
    signals: SignalMap,
    policy: Arc<dyn ConfirmationPolicy>,
    update_tx: broadcast::Sender<SignalUpdate>,
}

impl LifecycleTracker {
    pub fn new(signals: SignalMap, policy: Arc<dyn ConfirmationPolicy>) -> Self {
        let (update_tx, _) = broadcast::channel(64);
        Self {
            signals,
            policy,
            update_tx,
        }
    }

    /// Receive lifecycle transitions as they land.
    pub fn subscribe(&self) -> broadcast::Receiver<SignalUpdate> {
        self.update_tx.subscribe()
    }

    /// Schedule the pending-to-terminal transition for `signal`.
    /// Returns immediately; the spawned task outlives the tick that
    /// created the signal and writes the status exactly once, and only
    /// if the signal is still present and still pending.
    pub fn track(&self, signal: &TradingSignal) {
        let signals = self.signals.clone();
        let policy = self.policy.clone();
        let update_tx = self.update_tx.clone();
        let snapshot = signal.clone();

        tokio::spawn(async move {
            let status = policy.resolve(&snapshot).await;
            if status == SignalStatus::Pending {
                // a policy that cannot decide leaves the signal alone
                return;
            }

            let mut map = signals.write().await;
            match map.get_mut(&snapshot.id) {
                Some(tracked) if tracked.status == SignalStatus::Pending => {
                    tracked.status = status;
                    match status {
                        SignalStatus::Confirmed => info!(id = %snapshot.id, "signal confirmed"),
                        _ => info!(id = %snapshot.id, "signal invalidated"),
                    }
                    let _ = update_tx.send(SignalUpdate {
                        id: snapshot.id,
                        status,
                    });
                }
                _ => {
                    debug!(id = %snapshot.id, "signal gone or already resolved, skipping");
                }
            }
        });
    }
}
