//! Client side of the VentureChat messaging subsystem.
//!
//! The [`DeliveryCoordinator`] reconciles the two paths a message travels:
//! it persists through the conversation API first, then announces the
//! stored message on the live channel so the peer sees it immediately.

pub mod api;
pub mod cli;
pub mod coordinator;
pub mod error;
pub mod realtime;
pub mod typing;

// Re-export entry points
pub use api::{ConversationApi, HttpConversationApi};
pub use cli::{ClientConfig, run_client};
pub use coordinator::DeliveryCoordinator;
pub use error::ClientError;
pub use realtime::{LiveChannel, RealtimeConnection};
pub use typing::TypingDebouncer;
