//! Delivery Coordinator
//!
//! 1 つのチャット画面につき 1 つ生成し、永続パス (HTTP) とライブパス
//! (WebSocket) の両方からのメッセージを 1 本のビューにまとめます。
//! 送信は必ず「永続化してからリレー」の順で行い、履歴に存在しない
//! メッセージがライブで流れることはありません。

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;
use venturechat_server::{
    domain::{RoomKey, UserId},
    infrastructure::dto::{
        http::MessageDto,
        websocket::{ClientEvent, ReceiveMessagePayload, SendMessagePayload, ServerEvent},
    },
};

use crate::{
    api::ConversationApi, error::ClientError, realtime::LiveChannel, typing::TypingDebouncer,
};

/// How long a peer's `typing: true` is trusted without a follow-up.
pub const REMOTE_TYPING_TIMEOUT: Duration = Duration::from_secs(5);

/// Prefix of ids generated for relayed messages that carry no store id.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// What [`DeliveryCoordinator::apply`] changed in the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    MessageAdded(MessageDto),
    PeerTyping(bool),
    Unchanged,
}

pub struct DeliveryCoordinator {
    api: Arc<dyn ConversationApi>,
    live: Arc<dyn LiveChannel>,
    self_id: UserId,
    peer_id: UserId,
    room_key: RoomKey,
    typing: TypingDebouncer,
    messages: Vec<MessageDto>,
    peer_typing_since: Option<Instant>,
    remote_typing_timeout: Duration,
}

impl DeliveryCoordinator {
    /// # Errors
    ///
    /// Returns `ClientError::InvalidParticipant` if `self_id == peer_id`
    pub fn new(
        api: Arc<dyn ConversationApi>,
        live: Arc<dyn LiveChannel>,
        self_id: UserId,
        peer_id: UserId,
    ) -> Result<Self, ClientError> {
        if self_id == peer_id {
            return Err(ClientError::InvalidParticipant(format!(
                "cannot open a conversation with yourself ('{self_id}')"
            )));
        }
        let room_key = RoomKey::for_participants(&self_id, &peer_id);
        let typing = TypingDebouncer::new(Arc::clone(&live), room_key.clone(), self_id.clone());

        Ok(Self {
            api,
            live,
            self_id,
            peer_id,
            room_key,
            typing,
            messages: Vec::new(),
            peer_typing_since: None,
            remote_typing_timeout: REMOTE_TYPING_TIMEOUT,
        })
    }

    pub fn with_remote_typing_timeout(mut self, timeout: Duration) -> Self {
        self.remote_typing_timeout = timeout;
        self
    }

    pub fn with_typing_idle_window(mut self, idle_window: Duration) -> Self {
        self.typing = self.typing.with_idle_window(idle_window);
        self
    }

    pub fn room_key(&self) -> &RoomKey {
        &self.room_key
    }

    pub fn peer_id(&self) -> &UserId {
        &self.peer_id
    }

    /// Current view, oldest first.
    pub fn messages(&self) -> &[MessageDto] {
        &self.messages
    }

    /// Join the room, then replace the view with the stored history.
    pub async fn open(&mut self) -> Result<&[MessageDto], ClientError> {
        self.live
            .emit(ClientEvent::JoinRoom(self.room_key.as_str().to_string()));
        self.messages = self.api.list(self.peer_id.as_str()).await?;
        tracing::debug!(
            "Opened room {} with {} messages",
            self.room_key,
            self.messages.len()
        );
        Ok(&self.messages)
    }

    /// Re-join and re-fetch after the live connection was replaced.
    ///
    /// History is authoritative: anything relayed while disconnected is
    /// recovered from the store. Returns the messages the view did not
    /// show before, oldest first.
    pub async fn resync(
        &mut self,
        live: Arc<dyn LiveChannel>,
    ) -> Result<Vec<MessageDto>, ClientError> {
        self.typing.stop();
        self.typing.set_channel(Arc::clone(&live));
        self.live = live;
        self.peer_typing_since = None;

        let before = self.messages.clone();
        let history = self.open().await?;
        Ok(history
            .iter()
            .filter(|stored| !before.iter().any(|seen| is_same_message(seen, stored)))
            .cloned()
            .collect())
    }

    /// Persist `text`, then announce it to the peer.
    ///
    /// Nothing is emitted when persistence fails.
    pub async fn send(&mut self, text: &str) -> Result<MessageDto, ClientError> {
        let body = text.trim();
        if body.is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        let stored = self.api.create(self.peer_id.as_str(), body).await?;
        self.push_unique(stored.clone());

        self.live.emit(ClientEvent::SendMessage(SendMessagePayload {
            room_key: self.room_key.as_str().to_string(),
            body: stored.body.clone(),
            sender_id: stored.sender_id.clone(),
            receiver_id: stored.receiver_id.clone(),
            message_id: Some(stored.id.clone()),
            sent_at: Some(stored.sent_at.clone()),
        }));
        self.typing.stop();

        Ok(stored)
    }

    pub fn keystroke(&self) {
        self.typing.keystroke();
    }

    /// Fold a live event into the view.
    pub fn apply(&mut self, event: ServerEvent) -> ViewUpdate {
        match event {
            ServerEvent::ReceiveMessage(payload) => self.on_receive_message(payload),
            ServerEvent::UserTyping(payload) => {
                if payload.user_id != self.peer_id.as_str() {
                    return ViewUpdate::Unchanged;
                }
                let was_typing = self.remote_typing();
                self.peer_typing_since = payload.is_typing.then(Instant::now);
                if was_typing == payload.is_typing {
                    ViewUpdate::Unchanged
                } else {
                    ViewUpdate::PeerTyping(payload.is_typing)
                }
            }
        }
    }

    /// Whether the peer is typing. A stuck `true` expires after the remote
    /// typing timeout.
    pub fn remote_typing(&self) -> bool {
        self.peer_typing_since
            .is_some_and(|since| since.elapsed() < self.remote_typing_timeout)
    }

    /// Leave the room and end any typing burst.
    pub fn close(&mut self) {
        self.typing.stop();
        self.live
            .emit(ClientEvent::LeaveRoom(self.room_key.as_str().to_string()));
    }

    fn on_receive_message(&mut self, payload: ReceiveMessagePayload) -> ViewUpdate {
        let belongs = (payload.sender_id == self.peer_id.as_str()
            && payload.receiver_id == self.self_id.as_str())
            || (payload.sender_id == self.self_id.as_str()
                && payload.receiver_id == self.peer_id.as_str());
        if !belongs {
            tracing::debug!("Ignored message for another conversation");
            return ViewUpdate::Unchanged;
        }

        let message = MessageDto {
            id: payload
                .message_id
                .unwrap_or_else(|| format!("{LOCAL_ID_PREFIX}{}", uuid::Uuid::new_v4())),
            sender_id: payload.sender_id,
            receiver_id: payload.receiver_id,
            body: payload.body,
            sent_at: payload.sent_at.unwrap_or(payload.delivered_at),
        };

        if message.sender_id == self.peer_id.as_str() {
            self.peer_typing_since = None;
        }
        if self.push_unique(message.clone()) {
            ViewUpdate::MessageAdded(message)
        } else {
            ViewUpdate::Unchanged
        }
    }

    fn push_unique(&mut self, message: MessageDto) -> bool {
        if self.messages.iter().any(|m| m.id == message.id) {
            return false;
        }
        self.messages.push(message);
        true
    }
}

/// Whether `seen` (possibly a placeholder) is the view's copy of `stored`.
fn is_same_message(seen: &MessageDto, stored: &MessageDto) -> bool {
    if seen.id == stored.id {
        return true;
    }
    seen.id.starts_with(LOCAL_ID_PREFIX)
        && seen.sender_id == stored.sender_id
        && seen.receiver_id == stored.receiver_id
        && seen.body == stored.body
}
