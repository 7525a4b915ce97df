//! UseCase: メッセージ投稿処理（永続経路）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - 入力検証（receiverId, body）と会話ログへの追記
//!
//! ### なぜこのテストが必要か
//! - 永続経路は会話の正 (source of truth)。不正な入力を保存してはならない
//! - 送信者は常に認証済み ID から決まり、リクエストから偽装できないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージの保存
//! - 異常系：空の body、空の receiverId、自分宛て、ストレージ障害

use std::sync::Arc;

use crate::domain::{
    ConversationRepository, Identity, Message, MessageBody, NewMessage, UserId,
};

use super::error::PostMessageError;

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConversationRepository>,
}

impl PostMessageUseCase {
    /// 新しい PostMessageUseCase を作成
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self { repository }
    }

    /// メッセージ投稿を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 認証済みの送信者
    /// * `receiver_id` - 受信者 ID（未検証の文字列）
    /// * `body` - メッセージ本文（未検証の文字列）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - ID と sent_at が割り当てられた保存済みメッセージ
    /// * `Err(PostMessageError)` - 検証失敗または保存失敗
    pub async fn execute(
        &self,
        sender: &Identity,
        receiver_id: String,
        body: String,
    ) -> Result<Message, PostMessageError> {
        // 1. 値オブジェクトへの変換（検証）
        let receiver_id = UserId::new(receiver_id).map_err(PostMessageError::InvalidReceiver)?;
        let body = MessageBody::new(body).map_err(PostMessageError::InvalidBody)?;
        let draft = NewMessage::new(sender.user_id.clone(), receiver_id, body)
            .map_err(|_| PostMessageError::SelfAddressed)?;

        // 2. Repository 経由で会話ログに追記
        let message = self.repository.append(draft).await.map_err(|e| {
            tracing::error!("Failed to append message: {}", e);
            PostMessageError::Storage(e.to_string())
        })?;

        tracing::debug!(
            "Stored message {} from '{}' to '{}'",
            message.id,
            message.sender_id,
            message.receiver_id
        );
        Ok(message)
    }
}
