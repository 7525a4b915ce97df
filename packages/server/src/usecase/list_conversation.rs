//! UseCase: 会話履歴の取得（永続経路）

use std::sync::Arc;

use crate::domain::{ConversationRepository, Identity, Message, UserId};

use super::error::ListConversationError;

/// 会話履歴取得のユースケース
pub struct ListConversationUseCase {
    repository: Arc<dyn ConversationRepository>,
}

impl ListConversationUseCase {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    /// 呼び出し元と `peer_id` の間の全メッセージを sent_at 昇順で返す
    pub async fn execute(
        &self,
        caller: &Identity,
        peer_id: String,
    ) -> Result<Vec<Message>, ListConversationError> {
        let peer_id = UserId::new(peer_id).map_err(ListConversationError::InvalidPeer)?;

        self.repository
            .list_between(&caller.user_id, &peer_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list conversation: {}", e);
                ListConversationError::Storage(e.to_string())
            })
    }
}
