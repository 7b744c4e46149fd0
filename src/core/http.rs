//! HTTP endpoint server using Axum
//!
//! Exposes the analysis snapshot over a query endpoint and the signal
//! stream over a websocket. The engine itself has no opinion on
//! transport framing; everything wire-shaped lives here and in
//! `services::broadcast`.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::services::broadcast::{ConnectionInfo, SignalBroadcaster, StreamMessage};
use crate::signals::SignalEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SignalEngine>>,
    pub broadcaster: SignalBroadcaster,
    pub start_time: Arc<Instant>,
    pub feed_connected: Arc<AtomicBool>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/signals/analysis", get(signal_analysis))
        .route("/ws/signals", get(ws_signals))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(
    state: AppState,
    addr: std::net::SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "feed_connected": state.feed_connected.load(Ordering::Relaxed),
        "active_connections": state.broadcaster.subscriber_count(),
        "algorithm_status": "active",
    }))
}

async fn signal_analysis(State(state): State<AppState>) -> Json<Value> {
    let analysis = state.engine.read().await.get_current_analysis().await;
    Json(json!({
        "timestamp": chrono::Utc::now(),
        "algorithm": "orionis",
        "status": "active",
        "analysis": analysis,
    }))
}

async fn ws_signals(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state)).into_response()
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    let greeting = StreamMessage::Connection(ConnectionInfo::connected());
    if send_message(&mut sink, &greeting).await.is_err() {
        return;
    }
    info!("websocket subscriber connected");

    let mut rx = state.broadcaster.subscribe();
    loop {
        tokio::select! {
            outbound = rx.recv() => match outbound {
                Ok(message) => {
                    if send_message(&mut sink, &message).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "websocket subscriber lagged, messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            inbound = stream.next() => match inbound {
                // Subscribers only listen; inbound frames are ignored.
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }
    debug!("websocket subscriber disconnected");
}

async fn send_message(
    sink: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    message: &StreamMessage,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).map_err(axum::Error::new)?;
    sink.send(Message::Text(text.into())).await
}
