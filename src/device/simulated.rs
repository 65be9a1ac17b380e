use crate::audio::error::DeviceError;
use crate::audio::traits::{DeviceEventHandler, OutputDevice};
use crate::device::{DeviceEvent, DeviceEventKind, SubscriptionId};
use crate::util::{lock, task::TaskSlot};
use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tracing::debug;

const TICK: Duration = Duration::from_millis(250);

/// Every call the device has received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    SetSource(Option<String>),
    Load,
    Play,
    Pause,
    SetVolume(f32),
    Seek(Duration),
}

#[derive(Debug)]
struct DeviceInner {
    source: Option<String>,
    playing: bool,
    volume: f32,
    position: Duration,
    duration: Duration,
    play_allowed: bool,
    calls: Vec<DeviceCall>,
}

struct Shared {
    inner: Mutex<DeviceInner>,
    handlers: Mutex<Vec<(SubscriptionId, DeviceEventKind, DeviceEventHandler)>>,
}

impl Shared {
    fn emit(&self, event: DeviceEvent) {
        let kind = event.kind();
        let targets: Vec<DeviceEventHandler> = lock(&self.handlers)
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, handler)| handler.clone())
            .collect();

        for handler in targets {
            handler(event);
        }
    }
}

/// An in-process output device. It advances its clock while playing, emits
/// `timeUpdate`/`durationChange`/`ended` like a media element would, and can be
/// told to refuse play requests.
pub struct SimulatedDevice {
    shared: Arc<Shared>,
    next_id: AtomicU64,
    ticker: TaskSlot,
    track_length: Duration,
}

impl SimulatedDevice {
    pub fn new(track_length: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(DeviceInner {
                    source: None,
                    playing: false,
                    volume: 1.0,
                    position: Duration::ZERO,
                    duration: Duration::ZERO,
                    play_allowed: true,
                    calls: Vec::new(),
                }),
                handlers: Mutex::new(Vec::new()),
            }),
            next_id: AtomicU64::new(1),
            ticker: TaskSlot::new(),
            track_length,
        }
    }

    pub fn set_play_allowed(&self, allowed: bool) {
        lock(&self.shared.inner).play_allowed = allowed;
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        lock(&self.shared.inner).calls.clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.shared.inner).calls.clear();
    }

    pub fn source(&self) -> Option<String> {
        lock(&self.shared.inner).source.clone()
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.shared.inner).playing
    }

    pub fn volume(&self) -> f32 {
        lock(&self.shared.inner).volume
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.handlers).len()
    }

    /// Delivers `event` to subscribers as if the device had produced it.
    pub fn emit(&self, event: DeviceEvent) {
        self.shared.emit(event);
    }

    fn start_clock(&self) {
        let shared = self.shared.clone();
        self.ticker.arm(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            interval.tick().await;
            loop {
                interval.tick().await;

                let (position, finished) = {
                    let mut inner = lock(&shared.inner);
                    if !inner.playing {
                        break;
                    }
                    inner.position += TICK;
                    if !inner.duration.is_zero() && inner.position >= inner.duration {
                        inner.position = inner.duration;
                        inner.playing = false;
                        (inner.position, true)
                    } else {
                        (inner.position, false)
                    }
                };

                shared.emit(DeviceEvent::TimeUpdate(position));
                if finished {
                    debug!("simulated_device_ended");
                    shared.emit(DeviceEvent::Ended);
                    break;
                }
            }
        }));
    }
}

#[async_trait]
impl OutputDevice for SimulatedDevice {
    fn set_source(&self, url: Option<&str>) {
        self.ticker.cancel();
        let mut inner = lock(&self.shared.inner);
        inner.source = url.map(str::to_string);
        inner.playing = false;
        inner.position = Duration::ZERO;
        inner.duration = Duration::ZERO;
        let call = DeviceCall::SetSource(inner.source.clone());
        inner.calls.push(call);
    }

    fn load(&self) {
        let duration = {
            let mut inner = lock(&self.shared.inner);
            inner.calls.push(DeviceCall::Load);
            if inner.source.is_none() {
                return;
            }
            inner.position = Duration::ZERO;
            inner.duration = self.track_length;
            inner.duration
        };
        self.shared.emit(DeviceEvent::DurationChange(duration));
    }

    async fn play(&self) -> Result<(), DeviceError> {
        {
            let mut inner = lock(&self.shared.inner);
            inner.calls.push(DeviceCall::Play);
            if inner.source.is_none() {
                return Err(DeviceError::NoSource);
            }
            if !inner.play_allowed {
                return Err(DeviceError::PlaybackRejected(
                    "play request refused by policy".to_string(),
                ));
            }
            inner.playing = true;
        }
        self.start_clock();
        Ok(())
    }

    fn pause(&self) {
        self.ticker.cancel();
        let mut inner = lock(&self.shared.inner);
        inner.playing = false;
        inner.calls.push(DeviceCall::Pause);
    }

    fn set_volume(&self, level: f32) {
        let mut inner = lock(&self.shared.inner);
        inner.volume = level.clamp(0.0, 1.0);
        let call = DeviceCall::SetVolume(inner.volume);
        inner.calls.push(call);
    }

    fn current_time(&self) -> Duration {
        lock(&self.shared.inner).position
    }

    fn set_current_time(&self, position: Duration) {
        let mut inner = lock(&self.shared.inner);
        inner.position = if inner.duration.is_zero() {
            position
        } else {
            position.min(inner.duration)
        };
        let call = DeviceCall::Seek(inner.position);
        inner.calls.push(call);
    }

    fn duration(&self) -> Duration {
        lock(&self.shared.inner).duration
    }

    fn subscribe(&self, kind: DeviceEventKind, handler: DeviceEventHandler) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.shared.handlers).push((id, kind, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.shared.handlers).retain(|(existing, _, _)| *existing != id);
    }
}
