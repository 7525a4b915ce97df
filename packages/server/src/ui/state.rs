//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::{ConversationRepository, IdentityGate},
    realtime::{Broadcaster, BroadcasterHandle},
};

/// Shared application state
pub struct AppState {
    /// Conversation store (durable path)
    pub conversations: Arc<dyn ConversationRepository>,
    /// Bearer credential verification for the HTTP surface
    pub identity_gate: Arc<dyn IdentityGate>,
    /// Realtime broadcaster (live path)
    pub broadcaster: BroadcasterHandle,
}

impl AppState {
    /// Build the state and start the broadcaster task.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        identity_gate: Arc<dyn IdentityGate>,
    ) -> Self {
        Self {
            conversations,
            identity_gate,
            broadcaster: Broadcaster::spawn(),
        }
    }
}
