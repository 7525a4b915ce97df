//! Repository パターンの実装
//!
//! ドメイン層が定義する ConversationRepository trait の具体的な実装を提供します。
//! UseCase 層は trait（ドメイン層）に依存し、この実装に直接依存しません（依存性の逆転）。

pub mod inmemory;
pub mod jsonl;

pub use inmemory::InMemoryConversationRepository;
pub use jsonl::JsonlConversationRepository;

use crate::domain::{Message, Timestamp, UserId};

/// `sent_at` for the next appended message.
///
/// Never earlier than the last stored message, so the log stays totally
/// ordered even if the wall clock steps backwards.
pub(crate) fn next_sent_at(last: Option<Timestamp>) -> Timestamp {
    let now = Timestamp::now();
    match last {
        Some(last) if last > now => last,
        _ => now,
    }
}

/// Messages between `a` and `b`, ascending by `sent_at` (stable).
pub(crate) fn conversation_between(log: &[Message], a: &UserId, b: &UserId) -> Vec<Message> {
    let mut messages: Vec<_> = log.iter().filter(|m| m.is_between(a, b)).cloned().collect();
    messages.sort_by_key(|m| m.sent_at);
    messages
}
