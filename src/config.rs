//! Environment-based configuration for the engine and the server.

use chrono::Duration;
use std::env;
use std::net::SocketAddr;

/// Deployment environment, from the `ENVIRONMENT` variable.
/// Defaults to `sandbox` when unset.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Algorithm parameters. Defaults mirror the production MNQ setup;
/// every field can be overridden through the environment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub symbol: String,
    pub fast_ema_period: usize,
    pub slow_ema_period: usize,
    pub atr_period: usize,
    /// Stop distance in ATR multiples.
    pub atr_stop_multiplier: f64,
    /// TP1/TP2/runner distances in ATR multiples, nearest first.
    pub tp_atr_multipliers: [f64; 3],
    /// Minimum reward:risk at TP1 for a signal to be emitted.
    pub min_rr: f64,
    /// Minimum spacing between two emitted signals.
    pub signal_cooldown: Duration,
    /// Capacity of the tick/candle history windows.
    pub max_history: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbol: "MNQ".to_string(),
            fast_ema_period: 9,
            slow_ema_period: 21,
            atr_period: 14,
            atr_stop_multiplier: 2.0,
            tp_atr_multipliers: [1.5, 2.5, 4.0],
            min_rr: 1.5,
            signal_cooldown: Duration::minutes(15),
            max_history: 1000,
        }
    }
}

impl EngineConfig {
    /// Build from defaults with environment overrides applied.
    /// Unparseable values fall back to the default silently.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(symbol) = env::var("SYMBOL") {
            if !symbol.trim().is_empty() {
                config.symbol = symbol.trim().to_string();
            }
        }
        if let Some(v) = parse_env("FAST_EMA_PERIOD") {
            config.fast_ema_period = v;
        }
        if let Some(v) = parse_env("SLOW_EMA_PERIOD") {
            config.slow_ema_period = v;
        }
        if let Some(v) = parse_env("ATR_PERIOD") {
            config.atr_period = v;
        }
        if let Some(v) = parse_env::<f64>("ATR_STOP_MULTIPLIER") {
            config.atr_stop_multiplier = v;
        }
        if let Some(v) = parse_env::<i64>("SIGNAL_COOLDOWN_MINUTES") {
            config.signal_cooldown = Duration::minutes(v);
        }
        if let Some(v) = parse_env("MAX_HISTORY") {
            config.max_history = v;
        }
        config
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = env::var("HOST") {
            if !host.trim().is_empty() {
                config.host = host.trim().to_string();
            }
        }
        if let Some(port) = parse_env("PORT") {
            config.port = port;
        }
        config
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
