//! WebSocket event DTOs for the realtime broadcaster.
//!
//! Every frame is a JSON envelope `{"type": "<event>", "payload": ...}`.

use serde::{Deserialize, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Payload is the room key
    JoinRoom(String),
    /// Payload is the room key
    LeaveRoom(String),
    SendMessage(SendMessagePayload),
    Typing(TypingPayload),
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerEvent {
    ReceiveMessage(ReceiveMessagePayload),
    UserTyping(UserTypingPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub room_key: String,
    pub body: String,
    pub sender_id: String,
    pub receiver_id: String,
    /// Conversation store id, when the sender persisted before relaying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Conversation store timestamp (RFC 3339), paired with `message_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub room_key: String,
    pub user_id: String,
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveMessagePayload {
    pub body: String,
    pub sender_id: String,
    pub receiver_id: String,
    /// Assigned by the broadcaster at relay time (RFC 3339)
    pub delivered_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypingPayload {
    pub user_id: String,
    pub is_typing: bool,
}
