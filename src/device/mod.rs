pub mod simulated;

pub use simulated::{DeviceCall, SimulatedDevice};

use crate::audio::traits::{DeviceEventHandler, OutputDevice};
use std::sync::Arc;
use std::time::Duration;

pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    TimeUpdate(Duration),
    DurationChange(Duration),
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceEventKind {
    TimeUpdate,
    DurationChange,
    Ended,
}

impl DeviceEvent {
    pub fn kind(&self) -> DeviceEventKind {
        match self {
            DeviceEvent::TimeUpdate(_) => DeviceEventKind::TimeUpdate,
            DeviceEvent::DurationChange(_) => DeviceEventKind::DurationChange,
            DeviceEvent::Ended => DeviceEventKind::Ended,
        }
    }
}

/// A registered device handler that is unregistered when dropped.
pub struct DeviceSubscription {
    device: Arc<dyn OutputDevice>,
    id: Option<SubscriptionId>,
}

impl DeviceSubscription {
    pub fn new(
        device: Arc<dyn OutputDevice>,
        kind: DeviceEventKind,
        handler: DeviceEventHandler,
    ) -> Self {
        let id = device.subscribe(kind, handler);
        Self {
            device,
            id: Some(id),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            self.device.unsubscribe(id);
        }
    }
}

impl Drop for DeviceSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
