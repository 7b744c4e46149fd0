//! Orionis signal server
//!
//! Single process: simulated (or future live) tick feed -> signal
//! engine -> websocket/HTTP fan-out.

use dotenvy::dotenv;
use orionis::config::{self, EngineConfig, ServerConfig};
use orionis::core::http::{self, AppState};
use orionis::core::runtime::EngineRuntime;
use orionis::logging;
use orionis::services::broadcast::SignalBroadcaster;
use orionis::services::market_data::{MarketDataProvider, SimulatedMarketDataProvider};
use orionis::signals::SignalEngine;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!(environment = %env, "Starting Orionis signal server");

    let engine_config = EngineConfig::from_env();
    info!(
        symbol = %engine_config.symbol,
        fast_ema = engine_config.fast_ema_period,
        slow_ema = engine_config.slow_ema_period,
        atr = engine_config.atr_period,
        "Engine parameters"
    );

    let engine = Arc::new(RwLock::new(SignalEngine::new(engine_config.clone())));
    let broadcaster = SignalBroadcaster::new(256);

    let provider = SimulatedMarketDataProvider::new(engine_config.symbol.clone());
    let feed_connected = Arc::new(AtomicBool::new(provider.is_connected()));

    let runtime = EngineRuntime::new(
        engine.clone(),
        Box::new(provider),
        broadcaster.clone(),
    );
    tokio::spawn(runtime.run());

    let state = AppState {
        engine,
        broadcaster,
        start_time: Arc::new(Instant::now()),
        feed_connected,
    };

    let addr = ServerConfig::from_env().bind_addr()?;
    http::serve(state, addr).await?;

    info!("Orionis signal server stopped");
    Ok(())
}
