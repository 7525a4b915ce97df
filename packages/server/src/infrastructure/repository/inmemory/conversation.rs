//! InMemory Conversation Repository 実装
//!
//! ドメイン層が定義する ConversationRepository trait の具体的な実装。
//! Vec を追記専用のインメモリログとして使用します。プロセス終了で内容は失われるため、
//! 永続化が必要な場合は `JsonlConversationRepository` を使用します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConversationRepository, Message, MessageIdFactory, NewMessage, RepositoryError, UserId,
};

use super::super::{conversation_between, next_sent_at};

/// インメモリ Conversation Repository 実装
#[derive(Default)]
pub struct InMemoryConversationRepository {
    /// 追記専用のメッセージログ（挿入順 = sent_at 昇順）
    messages: Mutex<Vec<Message>>,
}

impl InMemoryConversationRepository {
    /// 新しい InMemoryConversationRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn append(&self, draft: NewMessage) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let sent_at = next_sent_at(messages.last().map(|m| m.sent_at));
        let message = Message::from_draft(MessageIdFactory::generate(), draft, sent_at);
        messages.push(message.clone());
        Ok(message)
    }

    async fn list_between(&self, a: &UserId, b: &UserId) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(conversation_between(&messages, a, b))
    }

    async fn count(&self) -> usize {
        self.messages.lock().await.len()
    }
}
