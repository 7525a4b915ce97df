//! Live channel to the server's realtime broadcaster.

use futures_util::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use venturechat_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use crate::error::ClientError;

/// Outbound half of the live path.
///
/// Emission is fire-and-forget: the server never acknowledges events, so
/// there is nothing to report back to the caller.
pub trait LiveChannel: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

impl LiveChannel for mpsc::UnboundedSender<ClientEvent> {
    fn emit(&self, event: ClientEvent) {
        if self.send(event).is_err() {
            tracing::debug!("Live channel closed; event dropped");
        }
    }
}

/// WebSocket connection to `/ws`.
///
/// A writer task drains emitted events onto the socket. A reader task
/// parses inbound frames into [`ServerEvent`]s; the inbound receiver
/// returned by [`RealtimeConnection::connect`] yields `None` once the
/// socket is gone.
pub struct RealtimeConnection {
    outbox: mpsc::UnboundedSender<ClientEvent>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl RealtimeConnection {
    pub async fn connect(
        server_url: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ServerEvent>), ClientError> {
        let url = websocket_url(server_url);
        let (stream, _) = connect_async(url.as_str()).await?;
        tracing::info!("Connected to {}", url);

        let (mut sink, mut source) = stream.split();
        let (outbox, mut outbound) = mpsc::unbounded_channel::<ClientEvent>();
        let (inbound_tx, inbound) = mpsc::unbounded_channel::<ServerEvent>();

        let writer = tokio::spawn(async move {
            while let Some(event) = outbound.recv().await {
                let frame = match serde_json::to_string(&event) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!("Failed to serialize client event: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader = tokio::spawn(async move {
            while let Some(Ok(msg)) = source.next().await {
                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<ServerEvent>(text.as_str()) {
                            Ok(event) => {
                                if inbound_tx.send(event).is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!("Dropped unparsable frame: {}", e),
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            tracing::info!("Live connection closed");
        });

        Ok((
            Self {
                outbox,
                reader,
                writer,
            },
            inbound,
        ))
    }

    /// Sender side usable as a shared [`LiveChannel`].
    pub fn channel(&self) -> mpsc::UnboundedSender<ClientEvent> {
        self.outbox.clone()
    }
}

impl LiveChannel for RealtimeConnection {
    fn emit(&self, event: ClientEvent) {
        self.outbox.emit(event);
    }
}

impl Drop for RealtimeConnection {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

/// `http://host:port` → `ws://host:port/ws` (and `https` → `wss`).
fn websocket_url(server_url: &str) -> String {
    let base = server_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{base}/ws")
}
