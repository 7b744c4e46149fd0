//! Orionis: streaming EMA-cross/ATR signal engine for MNQ futures.
//!
//! Ticks flow in from a market data provider, are aggregated into
//! one-minute candles, and evaluated for fast/slow EMA crossovers gated
//! by ATR-derived risk/reward. Emitted signals start out pending and
//! are resolved to confirmed/invalidated by a pluggable confirmation
//! policy. The `server` binary wires the engine to an HTTP/WebSocket
//! surface for subscribers.

pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod services;
pub mod signals;
