//! Core domain models for the messaging subsystem.

use serde::{Deserialize, Serialize};

use super::{
    error::MessageError,
    value_object::{MessageBody, MessageId, RoomKey, Timestamp, UserId},
};

/// A message between two participants, as recorded by the conversation store.
///
/// Immutable once created; `id` and `sent_at` are assigned at persistence time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier assigned by the conversation store
    pub id: MessageId,
    /// Author of the message
    pub sender_id: UserId,
    /// Addressee of the message
    pub receiver_id: UserId,
    /// Trimmed, non-empty text
    pub body: MessageBody,
    /// Server time when the message was persisted
    pub sent_at: Timestamp,
}

impl Message {
    /// Build a persisted message from a validated draft.
    pub fn from_draft(id: MessageId, draft: NewMessage, sent_at: Timestamp) -> Self {
        Self {
            id,
            sender_id: draft.sender_id,
            receiver_id: draft.receiver_id,
            body: draft.body,
            sent_at,
        }
    }

    /// Canonical room key of the conversation this message belongs to.
    pub fn room_key(&self) -> RoomKey {
        RoomKey::for_participants(&self.sender_id, &self.receiver_id)
    }

    /// Whether this message belongs to the conversation between `a` and `b`.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender_id == a && &self.receiver_id == b)
            || (&self.sender_id == b && &self.receiver_id == a)
    }
}

/// A message that has passed validation but has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub body: MessageBody,
}

impl NewMessage {
    /// Create a draft message.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::SelfAddressed` if sender and receiver are the same
    pub fn new(
        sender_id: UserId,
        receiver_id: UserId,
        body: MessageBody,
    ) -> Result<Self, MessageError> {
        if sender_id == receiver_id {
            return Err(MessageError::SelfAddressed(sender_id.into_string()));
        }
        Ok(Self {
            sender_id,
            receiver_id,
            body,
        })
    }
}

/// Platform role of an authenticated participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Investor,
    Entrepreneur,
}

/// Verified caller identity produced by the identity gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::MessageIdFactory;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn body(text: &str) -> MessageBody {
        MessageBody::new(text.to_string()).unwrap()
    }

    #[test]
    fn test_new_message_success() {
        // テスト項目: 送信者と受信者が異なる場合にドラフトを作成できる
        // when (操作):
        let result = NewMessage::new(user("investor"), user("founder"), body("hi"));

        // then (期待する結果):
        assert!(result.is_ok());
        let draft = result.unwrap();
        assert_eq!(draft.sender_id, user("investor"));
        assert_eq!(draft.receiver_id, user("founder"));
    }

    #[test]
    fn test_new_message_self_addressed_fails() {
        // テスト項目: 自分宛てのメッセージは作成できない
        // when (操作):
        let result = NewMessage::new(user("alice"), user("alice"), body("note to self"));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            MessageError::SelfAddressed("alice".to_string())
        );
    }

    #[test]
    fn test_message_room_key_matches_participants() {
        // テスト項目: 永続化されたメッセージのルームキーはライブルームのキーと一致する
        // given (前提条件):
        let draft = NewMessage::new(user("y"), user("x"), body("hello")).unwrap();
        let message = Message::from_draft(MessageIdFactory::generate(), draft, Timestamp::new(1));

        // then (期待する結果):
        assert_eq!(
            message.room_key(),
            RoomKey::for_participants(&user("x"), &user("y"))
        );
    }

    #[test]
    fn test_message_is_between() {
        // テスト項目: 会話の当事者判定は方向に依存しない
        // given (前提条件):
        let draft = NewMessage::new(user("x"), user("y"), body("hello")).unwrap();
        let message = Message::from_draft(MessageIdFactory::generate(), draft, Timestamp::new(1));

        // then (期待する結果):
        assert!(message.is_between(&user("x"), &user("y")));
        assert!(message.is_between(&user("y"), &user("x")));
        assert!(!message.is_between(&user("x"), &user("z")));
    }

    #[test]
    fn test_role_serialization() {
        // テスト項目: ロールは小文字でシリアライズされる
        assert_eq!(serde_json::to_string(&Role::Investor).unwrap(), "\"investor\"");
        let role: Role = serde_json::from_str("\"entrepreneur\"").unwrap();
        assert_eq!(role, Role::Entrepreneur);
    }
}
