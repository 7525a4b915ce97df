//! Outbound typing indicator.
//!
//! A burst of keystrokes produces exactly one `typing: true`. The burst
//! ends after an idle window with no keystrokes (or on an explicit
//! [`TypingDebouncer::stop`]) and produces exactly one `typing: false`.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{task::JoinHandle, time::Instant};
use venturechat_server::{
    domain::{RoomKey, UserId},
    infrastructure::dto::websocket::{ClientEvent, TypingPayload},
};

use crate::realtime::LiveChannel;

pub const TYPING_IDLE_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Default)]
struct BurstState {
    typing: bool,
    /// End of the current idle window; pushed back by every keystroke
    deadline: Option<Instant>,
    /// The single idle timer of the current burst
    timer: Option<JoinHandle<()>>,
}

pub struct TypingDebouncer {
    live: Arc<dyn LiveChannel>,
    room_key: RoomKey,
    user_id: UserId,
    idle_window: Duration,
    state: Arc<Mutex<BurstState>>,
}

impl TypingDebouncer {
    pub fn new(live: Arc<dyn LiveChannel>, room_key: RoomKey, user_id: UserId) -> Self {
        Self {
            live,
            room_key,
            user_id,
            idle_window: TYPING_IDLE_WINDOW,
            state: Arc::new(Mutex::new(BurstState::default())),
        }
    }

    pub fn with_idle_window(mut self, idle_window: Duration) -> Self {
        self.idle_window = idle_window;
        self
    }

    /// Point subsequent emissions at a new live channel (after a reconnect).
    pub fn set_channel(&mut self, live: Arc<dyn LiveChannel>) {
        self.live = live;
    }

    /// Record a keystroke. Must be called from within a tokio runtime.
    pub fn keystroke(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if !state.typing {
            state.typing = true;
            self.live.emit(self.event(true));
        }
        state.deadline = Some(Instant::now() + self.idle_window);
        if state.timer.is_none() {
            state.timer = Some(tokio::spawn(expire_when_idle(
                Arc::clone(&self.state),
                Arc::clone(&self.live),
                self.event(false),
            )));
        }
    }

    /// End the current burst now, if there is one.
    pub fn stop(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.deadline = None;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        if state.typing {
            state.typing = false;
            self.live.emit(self.event(false));
        }
    }

    pub fn is_typing(&self) -> bool {
        self.state.lock().map(|state| state.typing).unwrap_or(false)
    }

    fn event(&self, is_typing: bool) -> ClientEvent {
        ClientEvent::Typing(TypingPayload {
            room_key: self.room_key.as_str().to_string(),
            user_id: self.user_id.as_str().to_string(),
            is_typing,
        })
    }
}

impl Drop for TypingDebouncer {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock()
            && let Some(timer) = state.timer.take()
        {
            timer.abort();
        }
    }
}

/// Sleep until the burst's deadline stops moving, then end the burst.
async fn expire_when_idle(
    state: Arc<Mutex<BurstState>>,
    live: Arc<dyn LiveChannel>,
    idle_event: ClientEvent,
) {
    loop {
        let deadline = match state.lock() {
            Ok(state) => match state.deadline {
                Some(deadline) => deadline,
                None => return,
            },
            Err(_) => return,
        };
        tokio::time::sleep_until(deadline).await;

        let Ok(mut state) = state.lock() else {
            return;
        };
        if state.deadline.is_some_and(|deadline| deadline > Instant::now()) {
            continue;
        }
        state.deadline = None;
        state.timer = None;
        if state.typing {
            state.typing = false;
            live.emit(idle_event);
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn debouncer() -> (TypingDebouncer, mpsc::UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let x = UserId::new("x".to_string()).unwrap();
        let y = UserId::new("y".to_string()).unwrap();
        let room_key = RoomKey::for_participants(&x, &y);
        (TypingDebouncer::new(Arc::new(tx), room_key, x), rx)
    }

    fn typing_flags(rx: &mut mpsc::UnboundedReceiver<ClientEvent>) -> Vec<bool> {
        let mut flags = Vec::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                ClientEvent::Typing(payload) => flags.push(payload.is_typing),
                other => panic!("unexpected event: {other:?}"),
            }
        }
        flags
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_single_true() {
        // テスト項目: 入力が続く間は typing:true を 1 回しか送らない
        // given (前提条件):
        let (debouncer, mut rx) = debouncer();

        // when (操作):
        for _ in 0..5 {
            debouncer.keystroke();
            tokio::time::sleep(Duration::from_millis(300)).await;
        }

        // then (期待する結果):
        assert_eq!(typing_flags(&mut rx), vec![true]);
        assert!(debouncer.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_window_emits_single_false() {
        // テスト項目: 最後の入力から 1000ms 経過すると typing:false を 1 回だけ送る
        // given (前提条件):
        let (debouncer, mut rx) = debouncer();
        debouncer.keystroke();
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.keystroke();

        // when (操作):
        tokio::time::sleep(Duration::from_millis(999)).await;
        let before_window = typing_flags(&mut rx);
        tokio::time::sleep(Duration::from_millis(2000)).await;

        // then (期待する結果):
        assert_eq!(before_window, vec![true]);
        assert_eq!(typing_flags(&mut rx), vec![false]);
        assert!(!debouncer.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_burst_after_idle() {
        // テスト項目: アイドル後の入力は新しいバーストとして再び typing:true を送る
        let (debouncer, mut rx) = debouncer();

        debouncer.keystroke();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        debouncer.keystroke();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(typing_flags(&mut rx), vec![true, false, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_burst_immediately() {
        // テスト項目: stop() は即座に typing:false を送り、後から遅延 false は来ない
        // given (前提条件):
        let (debouncer, mut rx) = debouncer();
        debouncer.keystroke();

        // when (操作):
        debouncer.stop();
        tokio::time::sleep(Duration::from_millis(2000)).await;

        // then (期待する結果):
        assert_eq!(typing_flags(&mut rx), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_keeps_single_idle_timer() {
        // テスト項目: 連続入力中もアイドルタイマーのタスクは 1 つだけ
        // given (前提条件):
        let (debouncer, mut rx) = debouncer();
        let metrics = tokio::runtime::Handle::current().metrics();

        // when (操作):
        for _ in 0..50 {
            debouncer.keystroke();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        // then (期待する結果):
        assert_eq!(metrics.num_alive_tasks(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(typing_flags(&mut rx), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_without_burst_is_silent() {
        // テスト項目: 入力中でなければ stop() は何も送らない
        let (debouncer, mut rx) = debouncer();

        debouncer.stop();

        assert!(typing_flags(&mut rx).is_empty());
    }
}
