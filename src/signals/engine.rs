//! Streaming EMA-cross/ATR signal engine.
//!
//! Single writer: ticks must be delivered sequentially by one owner
//! task. Lifecycle tasks are the only concurrent writers and touch
//! only the in-flight signal map.

use crate::config::EngineConfig;
use crate::indicators::{atr, ema};
use crate::models::analysis::{AnalysisSnapshot, Trend};
use crate::models::market::Tick;
use crate::models::signal::{
    Killzone, SignalDirection, SignalStatus, TradingSignal, TP_MODES,
};
use crate::signals::candles::CandleAggregator;
use crate::signals::error::EngineError;
use crate::signals::lifecycle::{
    ConfirmationPolicy, LifecycleTracker, RandomConfirmation, SignalMap,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

pub struct SignalEngine {
    config: EngineConfig,
    aggregator: CandleAggregator,
    active_signals: SignalMap,
    last_signal_time: Option<DateTime<Utc>>,
    tracker: LifecycleTracker,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_policy(config, Arc::new(RandomConfirmation::default()))
    }

    /// Build with a custom confirmation policy (tests, or a real
    /// external confirmation source).
    pub fn with_policy(config: EngineConfig, policy: Arc<dyn ConfirmationPolicy>) -> Self {
        let active_signals: SignalMap = Arc::new(RwLock::new(HashMap::new()));
        let tracker = LifecycleTracker::new(active_signals.clone(), policy);
        let aggregator = CandleAggregator::new(config.max_history);
        info!(
            symbol = %config.symbol,
            fast_ema = config.fast_ema_period,
            slow_ema = config.slow_ema_period,
            atr = config.atr_period,
            "signal engine initialized"
        );
        Self {
            config,
            aggregator,
            active_signals,
            last_signal_time: None,
            tracker,
        }
    }

    /// Process one tick: feed the aggregator, evaluate the crossover
    /// rule, and emit at most one new signal. Non-positive prices are
    /// ignored silently; insufficient history and gate rejections are
    /// the normal empty outcome, not errors.
    pub async fn process_tick(&mut self, tick: &Tick) -> Result<Vec<TradingSignal>, EngineError> {
        if tick.price <= 0.0 {
            return Ok(Vec::new());
        }

        self.aggregator.update(tick.price, tick.timestamp);

        match self.check_ema_cross(tick).await? {
            Some(signal) => Ok(vec![signal]),
            None => Ok(Vec::new()),
        }
    }

    async fn check_ema_cross(
        &mut self,
        tick: &Tick,
    ) -> Result<Option<TradingSignal>, EngineError> {
        let required = self.config.fast_ema_period.max(self.config.slow_ema_period) + 2;
        if self.aggregator.candle_count() < required {
            return Ok(None);
        }

        let closes = self.aggregator.closes();
        let current_fast = ema(&closes, self.config.fast_ema_period);
        let current_slow = ema(&closes, self.config.slow_ema_period);
        let previous = &closes[..closes.len() - 1];
        let previous_fast = ema(previous, self.config.fast_ema_period);
        let previous_slow = ema(previous, self.config.slow_ema_period);
        ensure_finite(current_fast, "fast EMA")?;
        ensure_finite(current_slow, "slow EMA")?;

        let bullish = previous_fast <= previous_slow && current_fast > current_slow;
        let bearish = previous_fast >= previous_slow && current_fast < current_slow;
        if !bullish && !bearish {
            return Ok(None);
        }

        let now = tick.timestamp;
        if let Some(last) = self.last_signal_time {
            if now - last < self.config.signal_cooldown {
                return Ok(None);
            }
        }

        let highs = self.aggregator.highs();
        let lows = self.aggregator.lows();
        let atr_value = atr(&highs, &lows, &closes, self.config.atr_period);
        ensure_finite(atr_value, "ATR")?;
        if atr_value <= 0.0 {
            return Ok(None);
        }

        // Entry at the most recent raw tick price, not the candle close.
        let entry_price = self.aggregator.last_price().unwrap_or(tick.price);

        let direction = if bullish {
            SignalDirection::Long
        } else {
            SignalDirection::Short
        };
        let sign = match direction {
            SignalDirection::Long => 1.0,
            SignalDirection::Short => -1.0,
        };
        let stop_loss = entry_price - sign * atr_value * self.config.atr_stop_multiplier;
        let take_profits = self
            .config
            .tp_atr_multipliers
            .map(|m| entry_price + sign * atr_value * m);

        let risk = (entry_price - stop_loss).abs();
        let reward = (take_profits[0] - entry_price).abs();
        let rr = if risk > 0.0 { reward / risk } else { 0.0 };
        if rr < self.config.min_rr {
            return Ok(None);
        }

        let separation = (current_fast - current_slow).abs();
        let confidence = (0.6
            + (separation / entry_price) * 100.0
            + (atr_value / entry_price) * 50.0)
            .min(0.95);
        ensure_finite(confidence, "confidence")?;

        let signal = TradingSignal {
            id: Uuid::new_v4(),
            status: SignalStatus::Pending,
            direction,
            symbol: self.config.symbol.clone(),
            entry_time: now,
            entry_price: round2(entry_price),
            stop_loss: round2(stop_loss),
            take_profits: take_profits.map(round2),
            tp_modes: TP_MODES.map(String::from),
            reason: format!(
                "EMA{}x{} cross + ATR({:.1})",
                self.config.fast_ema_period, self.config.slow_ema_period, atr_value
            ),
            confidence: round2(confidence),
            rr_target: round1(rr),
            killzone: Killzone::at(now),
        };

        self.active_signals
            .write()
            .await
            .insert(signal.id, signal.clone());
        self.last_signal_time = Some(now);
        self.tracker.track(&signal);

        info!(
            id = %signal.id,
            direction = ?signal.direction,
            rr = signal.rr_target,
            killzone = ?signal.killzone,
            "signal generated"
        );

        Ok(Some(signal))
    }

    /// Read-only snapshot of current indicator values and engine
    /// status.
    pub async fn get_current_analysis(&self) -> AnalysisSnapshot {
        let min_candles = self.config.fast_ema_period.max(self.config.slow_ema_period);
        if self.aggregator.candle_count() < min_candles {
            return AnalysisSnapshot::InsufficientData {
                message: "Collecting market data for analysis...".to_string(),
            };
        }

        let closes = self.aggregator.closes();
        let fast_ema = ema(&closes, self.config.fast_ema_period);
        let slow_ema = ema(&closes, self.config.slow_ema_period);
        let atr_value = atr(
            &self.aggregator.highs(),
            &self.aggregator.lows(),
            &closes,
            self.config.atr_period,
        );
        let trend = if fast_ema > slow_ema {
            Trend::Bullish
        } else {
            Trend::Bearish
        };

        AnalysisSnapshot::Active {
            current_price: round2(self.aggregator.last_price().unwrap_or_default()),
            fast_ema: round2(fast_ema),
            slow_ema: round2(slow_ema),
            atr: round2(atr_value),
            trend,
            active_signals: self.active_signals.read().await.len(),
            killzone: Killzone::at(Utc::now()),
            last_signal: self.last_signal_time,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tracker(&self) -> &LifecycleTracker {
        &self.tracker
    }

    /// Handle to the in-flight signal map shared with lifecycle tasks.
    pub fn active_signals(&self) -> SignalMap {
        self.active_signals.clone()
    }

    pub fn last_signal_time(&self) -> Option<DateTime<Utc>> {
        self.last_signal_time
    }

    pub fn candle_count(&self) -> usize {
        self.aggregator.candle_count()
    }
}

fn ensure_finite(value: f64, quantity: &'static str) -> Result<(), EngineError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::NonFinite { quantity })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
