//! Repository trait definitions.
//!
//! The domain layer owns the interface; concrete storage lives in
//! `infrastructure::repository` (dependency inversion).

use async_trait::async_trait;

use super::{Message, NewMessage, RepositoryError, UserId};

/// Append-only conversation log.
///
/// Implementations assign `id` and `sent_at`. `sent_at` never decreases
/// across appends, and every appended message is visible to later reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Persist a validated draft and return the stored message.
    async fn append(&self, draft: NewMessage) -> Result<Message, RepositoryError>;

    /// All messages exchanged between `a` and `b` (either direction),
    /// ascending by `sent_at`; ties keep insertion order.
    async fn list_between(&self, a: &UserId, b: &UserId) -> Result<Vec<Message>, RepositoryError>;

    /// Total number of stored messages.
    async fn count(&self) -> usize;
}
