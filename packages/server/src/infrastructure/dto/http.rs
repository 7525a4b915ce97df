//! HTTP API request/response DTOs for the conversation store.

use serde::{Deserialize, Serialize};

use crate::domain::Message;

/// A persisted message as returned by the conversation endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub body: String,
    pub sent_at: String, // RFC 3339
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            sender_id: message.sender_id.as_str().to_string(),
            receiver_id: message.receiver_id.as_str().to_string(),
            body: message.body.as_str().to_string(),
            sent_at: message.sent_at.to_rfc3339(),
        }
    }
}

/// Body of `POST /api/conversations`
///
/// Both fields are optional at the wire level so that a missing field
/// yields a 400 with a readable message instead of a generic rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub receiver_id: Option<String>,
    /// `message` is the field name older web clients send
    #[serde(default, alias = "message")]
    pub body: Option<String>,
}

/// Error body shared by every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
