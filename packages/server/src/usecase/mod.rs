//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod error;
pub mod list_conversation;
pub mod post_message;

pub use error::{ListConversationError, PostMessageError};
pub use list_conversation::ListConversationUseCase;
pub use post_message::PostMessageUseCase;
