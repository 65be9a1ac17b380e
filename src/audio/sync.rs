use crate::audio::error::DeviceError;
use crate::audio::state::PlaybackState;
use crate::audio::traits::{NotificationKind, NotificationSink, OutputDevice};
use crate::device::{DeviceEvent, DeviceEventKind, DeviceSubscription};
use flume::Receiver;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

const PLAYBACK_ERROR_TITLE: &str = "Playback error";

/// What the device did while following a state change.
#[derive(Debug, Default, PartialEq)]
pub struct SyncOutcome {
    /// A new source was assigned; the playhead is back at zero.
    pub song_loaded: bool,
    pub rejected: Option<DeviceError>,
}

/// Binds a [`PlaybackState`] to a single output device: pushes state changes
/// down to the device and funnels device notifications back up in emission
/// order.
pub struct DeviceSynchronizer {
    device: Arc<dyn OutputDevice>,
    notifier: Arc<dyn NotificationSink>,
    subscriptions: Vec<DeviceSubscription>,
    events: Receiver<DeviceEvent>,
    attached: bool,
}

impl DeviceSynchronizer {
    pub fn attach(
        device: Arc<dyn OutputDevice>,
        notifier: Arc<dyn NotificationSink>,
        initial: &PlaybackState,
    ) -> Self {
        let (event_tx, events) = flume::unbounded();

        let subscriptions = [
            DeviceEventKind::TimeUpdate,
            DeviceEventKind::DurationChange,
            DeviceEventKind::Ended,
        ]
        .into_iter()
        .map(|kind| {
            let tx = event_tx.clone();
            DeviceSubscription::new(
                device.clone(),
                kind,
                Arc::new(move |event| {
                    let _ = tx.send(event);
                }),
            )
        })
        .collect();

        device.set_volume(initial.output_level());

        Self {
            device,
            notifier,
            subscriptions,
            events,
            attached: true,
        }
    }

    /// Device notifications waiting to be applied, oldest first.
    pub fn events(&self) -> &Receiver<DeviceEvent> {
        &self.events
    }

    pub fn device(&self) -> &Arc<dyn OutputDevice> {
        &self.device
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub async fn reconcile(&self, prev: &PlaybackState, next: &PlaybackState) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        if !self.attached {
            return outcome;
        }

        let song_changed = prev.current_song.as_ref().map(|s| s.id)
            != next.current_song.as_ref().map(|s| s.id);

        match &next.current_song {
            Some(song) if song_changed => {
                info!(id = song.id, src = song.audio_src.as_str(), "playback_song_loaded");
                self.discard_pending();
                self.device.set_source(Some(&song.audio_src));
                self.device.load();
                outcome.song_loaded = true;

                if next.is_playing {
                    outcome.rejected = self
                        .request_play("Could not play the audio track. Check the audio URL.")
                        .await
                        .err();
                }
            }
            Some(_) if prev.is_playing != next.is_playing => {
                if next.is_playing {
                    outcome.rejected = self
                        .request_play("Could not play the audio. Try again later.")
                        .await
                        .err();
                } else {
                    self.device.pause();
                }
            }
            _ => {}
        }

        self.apply_levels(prev, next);
        outcome
    }

    pub fn apply_levels(&self, prev: &PlaybackState, next: &PlaybackState) {
        if self.attached && prev.output_level() != next.output_level() {
            self.device.set_volume(next.output_level());
        }
    }

    pub fn seek(&self, position: Duration) {
        if self.attached {
            self.device.set_current_time(position);
        }
    }

    /// Rewinds the current source and plays it again.
    pub async fn restart(&self) -> Result<(), DeviceError> {
        if !self.attached {
            return Ok(());
        }
        self.discard_pending();
        self.device.set_current_time(Duration::ZERO);
        self.request_play("Could not restart the audio track.").await
    }

    /// Drops notifications still queued for the previous playthrough.
    fn discard_pending(&self) {
        let stale = self.events.drain().count();
        if stale > 0 {
            debug!(stale, "playback_stale_events_dropped");
        }
    }

    async fn request_play(&self, body: &str) -> Result<(), DeviceError> {
        match self.device.play().await {
            Ok(()) => {
                debug!("playback_play_accepted");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "playback_play_rejected");
                self.notifier
                    .notify(NotificationKind::Error, PLAYBACK_ERROR_TITLE, body);
                Err(err)
            }
        }
    }

    /// Stops the device, detaches its source and drops every subscription.
    /// Further calls are no-ops.
    pub fn teardown(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.device.pause();
        self.device.set_source(None);
        self.subscriptions.clear();
        info!("playback_device_released");
    }
}

impl Drop for DeviceSynchronizer {
    fn drop(&mut self) {
        self.teardown();
    }
}
