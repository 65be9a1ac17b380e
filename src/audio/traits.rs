use crate::audio::error::{DeviceError, LoadError};
use crate::device::{DeviceEvent, DeviceEventKind, SubscriptionId};
use crate::model::Song;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub type DeviceEventHandler = Arc<dyn Fn(DeviceEvent) + Send + Sync>;

/// A playable media sink. Everything except `play` takes effect immediately;
/// `play` may be refused by the device.
#[async_trait]
pub trait OutputDevice: Send + Sync {
    /// `None` detaches the current source.
    fn set_source(&self, url: Option<&str>);
    fn load(&self);
    async fn play(&self) -> Result<(), DeviceError>;
    fn pause(&self);
    /// Output level in `0.0..=1.0`.
    fn set_volume(&self, level: f32);
    fn current_time(&self) -> Duration;
    fn set_current_time(&self, position: Duration);
    fn duration(&self) -> Duration;
    fn subscribe(&self, kind: DeviceEventKind, handler: DeviceEventHandler) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

#[async_trait]
pub trait PlaylistLoader: Send + Sync {
    async fn load(&self, url: Option<&str>) -> Result<Vec<Song>, LoadError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// Fire-and-forget user-visible alerts.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, title: &str, body: &str);
}
