//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ValueObjectError;

/// メッセージ投稿時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostMessageError {
    /// receiverId が不正
    #[error("Invalid receiver id: {0}")]
    InvalidReceiver(ValueObjectError),

    /// body が不正（空、長すぎる）
    #[error("Invalid message body: {0}")]
    InvalidBody(ValueObjectError),

    /// 自分宛てのメッセージ
    #[error("Cannot send a message to yourself")]
    SelfAddressed,

    /// ストレージ障害
    #[error("Failed to store message: {0}")]
    Storage(String),
}

/// 会話取得時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListConversationError {
    /// peerId が不正
    #[error("Invalid peer id: {0}")]
    InvalidPeer(ValueObjectError),

    /// ストレージ障害
    #[error("Failed to load conversation: {0}")]
    Storage(String),
}
