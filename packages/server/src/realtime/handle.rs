use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ConnectionId, RoomKey},
    infrastructure::dto::websocket::ClientEvent,
};

/// Snapshot of the broadcaster's tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcasterStats {
    pub connections: usize,
    pub rooms: usize,
}

pub(super) enum Command {
    Connect {
        connection: ConnectionId,
        outbox: mpsc::UnboundedSender<String>,
    },
    Event {
        connection: ConnectionId,
        event: ClientEvent,
    },
    Disconnect {
        connection: ConnectionId,
    },
    RoomMembers {
        room_key: RoomKey,
        reply: oneshot::Sender<Vec<ConnectionId>>,
    },
    Stats {
        reply: oneshot::Sender<BroadcasterStats>,
    },
}

/// Cloneable front door to the broadcaster task.
///
/// `connect`, `dispatch` and `disconnect` are fire-and-forget: they never
/// wait for the broadcaster and report nothing back.
#[derive(Clone)]
pub struct BroadcasterHandle {
    commands: mpsc::UnboundedSender<Command>,
    next_connection: Arc<AtomicU64>,
}

impl BroadcasterHandle {
    pub(super) fn new(commands: mpsc::UnboundedSender<Command>) -> Self {
        Self {
            commands,
            next_connection: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a new connection whose outbound frames go to `outbox`.
    pub fn connect(&self, outbox: mpsc::UnboundedSender<String>) -> ConnectionId {
        let connection = ConnectionId::new(self.next_connection.fetch_add(1, Ordering::Relaxed));
        self.send(Command::Connect { connection, outbox });
        connection
    }

    /// Hand an inbound event to the broadcaster.
    pub fn dispatch(&self, connection: ConnectionId, event: ClientEvent) {
        self.send(Command::Event { connection, event });
    }

    /// Drop the connection and all of its room memberships.
    pub fn disconnect(&self, connection: ConnectionId) {
        self.send(Command::Disconnect { connection });
    }

    /// Current members of `room_key`. Empty if the broadcaster has stopped.
    pub async fn room_members(&self, room_key: RoomKey) -> Vec<ConnectionId> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::RoomMembers { room_key, reply });
        rx.await.unwrap_or_default()
    }

    pub async fn stats(&self) -> BroadcasterStats {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stats { reply });
        rx.await.unwrap_or_default()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Broadcaster is not running; command dropped");
        }
    }
}
