use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessageBody, RoomKey, RoomRouter, Timestamp, UserId},
    infrastructure::dto::websocket::{
        ClientEvent, ReceiveMessagePayload, SendMessagePayload, ServerEvent, TypingPayload,
        UserTypingPayload,
    },
};

use super::handle::{BroadcasterHandle, BroadcasterStats, Command};

/// Connection multiplexer and event relay.
///
/// Does not persist anything: the sender's client writes to the
/// conversation store first and then announces the message here.
/// Delivery is best-effort and at-most-once.
#[derive(Default)]
pub struct Broadcaster {
    router: RoomRouter,
    connections: HashMap<ConnectionId, mpsc::UnboundedSender<String>>,
}

impl Broadcaster {
    /// Start the broadcaster task on the current runtime.
    ///
    /// The task stops once every handle has been dropped.
    pub fn spawn() -> BroadcasterHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::default().run(rx));
        BroadcasterHandle::new(tx)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        tracing::info!("Broadcaster started");
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        tracing::info!("Broadcaster stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Connect { connection, outbox } => {
                tracing::debug!("{} connected", connection);
                self.connections.insert(connection, outbox);
            }
            Command::Event { connection, event } => {
                if !self.connections.contains_key(&connection) {
                    tracing::debug!("Event from unknown {} ignored", connection);
                    return;
                }
                match event {
                    ClientEvent::JoinRoom(room_key) => self.on_join_room(connection, room_key),
                    ClientEvent::LeaveRoom(room_key) => self.on_leave_room(connection, room_key),
                    ClientEvent::SendMessage(payload) => self.on_send_message(connection, payload),
                    ClientEvent::Typing(payload) => self.on_typing(connection, payload),
                }
            }
            Command::Disconnect { connection } => self.on_disconnect(connection),
            Command::RoomMembers { room_key, reply } => {
                let _ = reply.send(self.router.members(&room_key));
            }
            Command::Stats { reply } => {
                let _ = reply.send(BroadcasterStats {
                    connections: self.connections.len(),
                    rooms: self.router.room_count(),
                });
            }
        }
    }

    fn on_join_room(&mut self, connection: ConnectionId, room_key: String) {
        let Ok(room_key) = RoomKey::new(room_key) else {
            tracing::warn!("Dropped join-room from {}: invalid room key", connection);
            return;
        };
        if self.router.join(connection, room_key.clone()) {
            tracing::info!("{} joined room {}", connection, room_key);
        }
    }

    fn on_leave_room(&mut self, connection: ConnectionId, room_key: String) {
        let Ok(room_key) = RoomKey::new(room_key) else {
            tracing::warn!("Dropped leave-room from {}: invalid room key", connection);
            return;
        };
        if self.router.leave(connection, &room_key) {
            tracing::info!("{} left room {}", connection, room_key);
        }
    }

    fn on_send_message(&mut self, connection: ConnectionId, payload: SendMessagePayload) {
        let parsed = (
            RoomKey::new(payload.room_key),
            MessageBody::new(payload.body),
            UserId::new(payload.sender_id),
            UserId::new(payload.receiver_id),
        );
        let (Ok(room_key), Ok(body), Ok(sender_id), Ok(receiver_id)) = parsed else {
            tracing::warn!("Dropped malformed send-message from {}", connection);
            return;
        };
        if RoomKey::for_participants(&sender_id, &receiver_id) != room_key {
            tracing::warn!(
                "Dropped send-message from {}: room {} does not belong to '{}' and '{}'",
                connection,
                room_key,
                sender_id,
                receiver_id
            );
            return;
        }

        let event = ServerEvent::ReceiveMessage(ReceiveMessagePayload {
            body: body.into_string(),
            sender_id: sender_id.into_string(),
            receiver_id: receiver_id.into_string(),
            delivered_at: Timestamp::now().to_rfc3339(),
            message_id: payload.message_id,
            sent_at: payload.sent_at,
        });
        self.relay(connection, &room_key, &event);
    }

    fn on_typing(&mut self, connection: ConnectionId, payload: TypingPayload) {
        let (Ok(room_key), Ok(user_id)) =
            (RoomKey::new(payload.room_key), UserId::new(payload.user_id))
        else {
            tracing::warn!("Dropped malformed typing event from {}", connection);
            return;
        };

        let event = ServerEvent::UserTyping(UserTypingPayload {
            user_id: user_id.into_string(),
            is_typing: payload.is_typing,
        });
        self.relay(connection, &room_key, &event);
    }

    fn on_disconnect(&mut self, connection: ConnectionId) {
        self.connections.remove(&connection);
        let left = self.router.leave_all(connection);
        tracing::info!("{} disconnected (left {} rooms)", connection, left.len());
    }

    /// Deliver `event` to every member of `room_key` except `origin`.
    fn relay(&mut self, origin: ConnectionId, room_key: &RoomKey, event: &ServerEvent) {
        let targets = self.router.peers(room_key, origin);
        if targets.is_empty() {
            tracing::debug!("No peers in room {} to relay to", room_key);
            return;
        }

        let frame = match serde_json::to_string(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize server event: {}", e);
                return;
            }
        };

        let mut stale = Vec::new();
        for target in targets {
            let delivered = self
                .connections
                .get(&target)
                .is_some_and(|outbox| outbox.send(frame.clone()).is_ok());
            if !delivered {
                stale.push(target);
            }
        }

        for target in stale {
            tracing::debug!("Pruning closed {}", target);
            self.on_disconnect(target);
        }
    }
}
