use crate::audio::traits::{NotificationKind, NotificationSink, OutputDevice};
use crate::model::{Channel, ChatMessage};
use crate::stream::{chatter, feed::ChatFeed};
use crate::util::{lock, task::TaskSlot};
use std::ops::Range;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Connected,
    Streaming,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamingSessionState {
    pub current_channel: Option<Channel>,
    pub is_streaming: bool,
    /// `0..=100`.
    pub volume: u8,
    pub is_muted: bool,
    pub chat_messages: ChatFeed,
    pub is_connected: bool,
}

impl StreamingSessionState {
    fn idle(volume: u8, is_muted: bool, feed_capacity: usize) -> Self {
        Self {
            current_channel: None,
            is_streaming: false,
            volume: volume.min(100),
            is_muted,
            chat_messages: ChatFeed::new(feed_capacity),
            is_connected: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.is_connected, self.is_streaming) {
            (false, _) => SessionPhase::Idle,
            (true, false) => SessionPhase::Connected,
            (true, true) => SessionPhase::Streaming,
        }
    }

    pub fn output_level(&self) -> f32 {
        if self.is_muted {
            0.0
        } else {
            f32::from(self.volume) / 100.0
        }
    }
}

struct SessionShared {
    state: StreamingSessionState,
    /// Bumped on every connect and disconnect. Chatter from an older epoch is
    /// discarded.
    epoch: u64,
}

/// Connection lifecycle for a simulated live channel. While connected a
/// background task injects listener chatter at randomized intervals.
pub struct ChannelSession {
    shared: Arc<Mutex<SessionShared>>,
    device: Arc<dyn OutputDevice>,
    notifier: Arc<dyn NotificationSink>,
    chatter: TaskSlot,
    chatter_delay_ms: Range<u64>,
}

impl ChannelSession {
    pub fn new(
        device: Arc<dyn OutputDevice>,
        notifier: Arc<dyn NotificationSink>,
        volume: u8,
        feed_capacity: usize,
        chatter_delay_ms: Range<u64>,
    ) -> Self {
        let state = StreamingSessionState::idle(volume, false, feed_capacity);
        device.set_volume(state.output_level());

        Self {
            shared: Arc::new(Mutex::new(SessionShared { state, epoch: 0 })),
            device,
            notifier,
            chatter: TaskSlot::new(),
            chatter_delay_ms,
        }
    }

    pub fn snapshot(&self) -> StreamingSessionState {
        lock(&self.shared).state.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        lock(&self.shared).state.phase()
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.shared).state.is_connected
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.shared).state.chat_messages.to_vec()
    }

    pub fn is_chatter_armed(&self) -> bool {
        self.chatter.is_armed()
    }

    /// Tears down any active session first, then binds the device to
    /// `channel` and starts the background chatter.
    pub fn connect(&mut self, channel: Channel) {
        if self.is_connected() {
            self.disconnect();
        }

        self.device.set_source(Some(&channel.stream_url));

        let epoch = {
            let mut shared = lock(&self.shared);
            shared.epoch += 1;
            let state = &mut shared.state;
            state.chat_messages
                .reset_with(ChatMessage::system(format!("Connected to {}", channel.name)));
            state.current_channel = Some(channel.clone());
            state.is_streaming = false;
            state.is_connected = true;
            shared.epoch
        };

        info!(channel = channel.id.as_str(), "session_connected");
        self.spawn_chatter(epoch);
    }

    pub async fn start(&mut self) {
        if !self.is_connected() {
            warn!("session_start_without_channel");
            return;
        }

        let result = self.device.play().await;
        let mut shared = lock(&self.shared);
        match result {
            Ok(()) => {
                shared.state.is_streaming = true;
                info!("session_streaming");
            }
            Err(err) => {
                shared.state.is_streaming = false;
                drop(shared);
                error!(error = %err, "session_start_rejected");
                self.notifier.notify(
                    NotificationKind::Error,
                    "Stream error",
                    "Could not start the stream. Try again later.",
                );
            }
        }
    }

    pub fn stop(&mut self) {
        self.device.pause();
        lock(&self.shared).state.is_streaming = false;
        info!("session_stopped");
    }

    pub fn set_volume(&mut self, volume: u8) {
        let level = {
            let mut shared = lock(&self.shared);
            let state = &mut shared.state;
            state.volume = volume.min(100);
            if volume > 0 && state.is_muted {
                state.is_muted = false;
            }
            state.output_level()
        };
        self.device.set_volume(level);
    }

    pub fn toggle_mute(&mut self) {
        let level = {
            let mut shared = lock(&self.shared);
            shared.state.is_muted = !shared.state.is_muted;
            shared.state.output_level()
        };
        self.device.set_volume(level);
    }

    /// Returns to idle. The chatter task is cancelled and the device released
    /// before this returns; calling it while idle does nothing.
    pub fn disconnect(&mut self) {
        {
            let mut shared = lock(&self.shared);
            if !shared.state.is_connected {
                return;
            }
            shared.epoch += 1;
            let capacity = shared.state.chat_messages.capacity();
            shared.state =
                StreamingSessionState::idle(shared.state.volume, shared.state.is_muted, capacity);
        }

        self.chatter.cancel();
        self.device.pause();
        self.device.set_source(None);
        info!("session_disconnected");
    }

    /// Appends a message authored by the local user. Ignored while
    /// disconnected or when `text` is blank.
    pub fn send_chat_message(&mut self, text: &str, username: &str, color: &str) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut shared = lock(&self.shared);
        if !shared.state.is_connected {
            return None;
        }
        let message = ChatMessage::user(username.to_uppercase(), text, color);
        shared.state.chat_messages.push(message.clone());
        Some(message)
    }

    pub fn push_system_message(&mut self, text: &str) -> ChatMessage {
        let message = ChatMessage::system(text);
        lock(&self.shared).state.chat_messages.push(message.clone());
        message
    }

    pub fn clear_chat(&mut self) {
        lock(&self.shared).state.chat_messages.clear();
    }

    fn spawn_chatter(&self, epoch: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("session_chatter_without_runtime");
            return;
        };

        let shared = self.shared.clone();
        let delay_ms = self.chatter_delay_ms.clone();

        self.chatter.arm(runtime.spawn(async move {
            loop {
                let wait = chatter::random_delay(&delay_ms, &mut rand::rng());
                tokio::time::sleep(wait).await;

                let delivered = {
                    let mut guard = lock(&shared);
                    if guard.epoch != epoch || !guard.state.is_connected {
                        false
                    } else {
                        let message = chatter::random_message(&mut rand::rng());
                        debug!(user = message.username.as_str(), "session_chatter");
                        guard.state.chat_messages.push(message);
                        true
                    }
                };
                if !delivered {
                    break;
                }
            }
        }));
    }
}

impl Drop for ChannelSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}
