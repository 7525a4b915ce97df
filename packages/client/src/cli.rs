//! Interactive terminal client.
//!
//! Each line typed counts as one keystroke burst followed by a send.
//! Remote messages and the peer's typing indicator are printed as they
//! arrive. `/quit` (or Ctrl-D) closes the chat.

use std::{sync::Arc, time::Duration};

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use venturechat_server::{
    domain::UserId,
    infrastructure::dto::{http::MessageDto, websocket::ServerEvent},
};

use crate::{
    api::HttpConversationApi,
    coordinator::{DeliveryCoordinator, ViewUpdate},
    error::ClientError,
    realtime::RealtimeConnection,
};

const RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Terminal chat client for the investor/entrepreneur platform
#[derive(Debug, Clone, Parser)]
#[command(name = "venturechat-client", version, about)]
pub struct ClientConfig {
    /// Server base URL
    #[arg(long, env = "VENTURECHAT_SERVER", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Bearer token issued at login
    #[arg(long, env = "VENTURECHAT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Your user id (must match the token)
    #[arg(long)]
    pub user_id: String,

    /// The participant to chat with
    #[arg(long)]
    pub peer_id: String,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let self_id = UserId::new(config.user_id.clone())
        .map_err(|e| ClientError::InvalidParticipant(e.to_string()))?;
    let peer_id = UserId::new(config.peer_id.clone())
        .map_err(|e| ClientError::InvalidParticipant(e.to_string()))?;

    let api = Arc::new(HttpConversationApi::new(&config.server, &config.token));
    let (mut connection, mut inbound) = RealtimeConnection::connect(&config.server).await?;
    let mut coordinator =
        DeliveryCoordinator::new(api, Arc::new(connection.channel()), self_id, peer_id)?;

    for message in coordinator.open().await? {
        print_message(message);
    }

    let mut lines = spawn_line_reader();
    let mut typing_check = tokio::time::interval(Duration::from_millis(500));
    let mut peer_typing = false;

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                if line.trim() == "/quit" {
                    break;
                }
                coordinator.keystroke();
                match coordinator.send(&line).await {
                    Ok(_) => {}
                    Err(ClientError::EmptyMessage) => {}
                    Err(ClientError::Unauthenticated) => {
                        println!("Session expired. Please sign in again.");
                        return Err(ClientError::Unauthenticated);
                    }
                    Err(e) => println!("! not sent: {e}"),
                }
            }
            event = inbound.recv() => {
                let Some(event) = event else {
                    println!("! connection lost, reconnecting...");
                    (connection, inbound) = reconnect(&config.server).await?;
                    let recovered = coordinator.resync(Arc::new(connection.channel())).await?;
                    println!("! reconnected");
                    for message in &recovered {
                        print_message(message);
                    }
                    continue;
                };
                match coordinator.apply(event) {
                    ViewUpdate::MessageAdded(message) => print_message(&message),
                    ViewUpdate::PeerTyping(_) | ViewUpdate::Unchanged => {}
                }
            }
            _ = typing_check.tick() => {}
        }

        let now_typing = coordinator.remote_typing();
        if now_typing != peer_typing {
            peer_typing = now_typing;
            if now_typing {
                println!("  {} is typing...", coordinator.peer_id());
            }
        }
    }

    coordinator.close();
    // Let the writer flush leave-room before the socket is dropped
    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(connection);
    Ok(())
}

async fn reconnect(
    server: &str,
) -> Result<(RealtimeConnection, mpsc::UnboundedReceiver<ServerEvent>), ClientError> {
    let mut attempt = 1;
    loop {
        tokio::time::sleep(RECONNECT_DELAY).await;
        match RealtimeConnection::connect(server).await {
            Ok(connected) => return Ok(connected),
            Err(e) if attempt < RECONNECT_ATTEMPTS => {
                tracing::warn!("Reconnect attempt {} failed: {}", attempt, e);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Read stdin lines on a blocking thread.
fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    tokio::task::spawn_blocking(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to open terminal: {}", e);
                return;
            }
        };
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Failed to read line: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn print_message(message: &MessageDto) {
    println!("[{}] {}: {}", message.sent_at, message.sender_id, message.body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_flags() {
        // テスト項目: 必須フラグを指定すればクライアント設定を組み立てられる
        let config = ClientConfig::try_parse_from([
            "venturechat-client",
            "--token",
            "t",
            "--user-id",
            "investor-1",
            "--peer-id",
            "founder-1",
        ])
        .unwrap();

        assert_eq!(config.server, "http://127.0.0.1:3000");
        assert_eq!(config.user_id, "investor-1");
        assert_eq!(config.peer_id, "founder-1");
    }

    #[test]
    fn test_parse_requires_peer() {
        // テスト項目: 相手の ID がなければエラー
        let result = ClientConfig::try_parse_from([
            "venturechat-client",
            "--token",
            "t",
            "--user-id",
            "investor-1",
        ]);
        assert!(result.is_err());
    }
}
