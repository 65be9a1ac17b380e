use crate::audio::traits::{NotificationKind, NotificationSink};
use crate::event::events::Event;
use crate::util::lock;
use flume::Sender;
use std::sync::Mutex;
use tracing::{error, info};

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, body: &str) {
        match kind {
            NotificationKind::Info => info!(title, body, "notification"),
            NotificationKind::Error => error!(title, body, "notification"),
        }
    }
}

/// Forwards notifications onto the application event bus.
#[derive(Clone)]
pub struct BusNotifier {
    event_tx: Sender<Event>,
}

impl BusNotifier {
    pub fn new(event_tx: Sender<Event>) -> Self {
        Self { event_tx }
    }
}

impl NotificationSink for BusNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, body: &str) {
        LogNotifier.notify(kind, title, body);
        let _ = self.event_tx.send(Event::Notification {
            kind,
            title: title.to_string(),
            body: body.to_string(),
        });
    }
}

/// Keeps every notification it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<(NotificationKind, String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<(NotificationKind, String, String)> {
        lock(&self.received).clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        lock(&self.received).iter().filter(|(k, _, _)| *k == kind).count()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, title: &str, body: &str) {
        lock(&self.received).push((kind, title.to_string(), body.to_string()));
    }
}
