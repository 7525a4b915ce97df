//! WebSocket connection handlers.
//!
//! Each socket is split into a reader task, which parses frames and hands
//! them to the broadcaster, and a writer task, which drains the
//! connection's outbox. When either side ends, the other is aborted and
//! the connection is disconnected from every room.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::ClientEvent,
    realtime::BroadcasterHandle,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let broadcaster = state.broadcaster.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

async fn handle_socket(socket: WebSocket, broadcaster: BroadcasterHandle) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive relayed frames
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection = broadcaster.connect(tx);
    tracing::info!("{} opened", connection);

    let inbound = broadcaster.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on {}: {}", connection, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if let Some(event) = parse_client_event(connection, text.as_str().as_bytes()) {
                        inbound.dispatch(connection, event);
                    }
                }
                Message::Binary(bytes) => {
                    if let Some(event) = parse_client_event(connection, &bytes) {
                        inbound.dispatch(connection, event);
                    }
                }
                Message::Close(_) => {
                    tracing::info!("{} requested close", connection);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to forward relayed frames to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    broadcaster.disconnect(connection);
    tracing::info!("{} closed", connection);
}

/// Decode one inbound frame. Malformed frames are dropped: the live path
/// has no acknowledgement channel to report them on.
fn parse_client_event(connection: ConnectionId, raw: &[u8]) -> Option<ClientEvent> {
    match serde_json::from_slice::<ClientEvent>(raw) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!("Dropped malformed frame from {}: {}", connection, e);
            None
        }
    }
}
