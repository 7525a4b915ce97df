//! Shared fixtures for the integration tests.
//!
//! Each test serves the real router in-process on its own fixed port, so
//! tests in the same binary can run in parallel.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use venturechat_server::{
    build_app,
    domain::Role,
    infrastructure::{
        identity::{JwtClaims, JwtIdentityGate},
        repository::InMemoryConversationRepository,
    },
    ui::state::AppState,
};

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve a fresh in-memory instance on `127.0.0.1:port`.
    pub async fn start(port: u16) -> Self {
        let state = Arc::new(AppState::new(
            Arc::new(InMemoryConversationRepository::new()),
            Arc::new(JwtIdentityGate::new(JWT_SECRET)),
        ));
        let app = build_app(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Mint a bearer token the server accepts.
pub fn token_for(user_id: &str, role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        user_id: user_id.to_string(),
        role,
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to encode token")
}

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Thin WebSocket client speaking JSON frames.
pub struct WsClient {
    stream: WsStream,
}

impl WsClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        Self { stream }
    }

    pub async fn send_json(&mut self, value: serde_json::Value) {
        self.send_raw(value.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: String) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn join(&mut self, room_key: &str) {
        self.send_json(serde_json::json!({"type": "join-room", "payload": room_key}))
            .await;
    }

    /// Next JSON frame, or `None` if nothing arrives within `timeout`.
    pub async fn recv_json_within(&mut self, timeout: Duration) -> Option<serde_json::Value> {
        loop {
            let next = tokio::time::timeout(timeout, self.stream.next()).await.ok()??;
            match next.ok()? {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON frame"));
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    pub async fn recv_json(&mut self) -> serde_json::Value {
        self.recv_json_within(Duration::from_secs(2))
            .await
            .expect("Expected a frame")
    }

    pub async fn expect_silence(&mut self) {
        let frame = self.recv_json_within(Duration::from_millis(300)).await;
        assert!(frame.is_none(), "Unexpected frame: {frame:?}");
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Give the broadcaster time to process frames already on the wire.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
