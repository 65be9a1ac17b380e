use crate::audio::{
    commands::AudioCommand,
    error::DeviceError,
    state::{PlaybackAction, PlaybackState},
    sync::DeviceSynchronizer,
    traits::{NotificationSink, OutputDevice},
};
use crate::device::DeviceEvent;
use crate::model::Song;
use flume::Receiver;
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Owns the playback state and the device it drives. Every operation applies a
/// single transition and then lets the synchronizer bring the device in line
/// before returning, so callers never see a half-applied change.
pub struct PlaybackController {
    state: PlaybackState,
    sync: DeviceSynchronizer,
    rng: StdRng,
}

impl PlaybackController {
    pub fn new(
        device: Arc<dyn OutputDevice>,
        notifier: Arc<dyn NotificationSink>,
        volume: f32,
    ) -> Self {
        Self::with_rng(device, notifier, volume, StdRng::from_os_rng())
    }

    pub fn with_rng(
        device: Arc<dyn OutputDevice>,
        notifier: Arc<dyn NotificationSink>,
        volume: f32,
        rng: StdRng,
    ) -> Self {
        let state = PlaybackState::with_volume(volume);
        let sync = DeviceSynchronizer::attach(device, notifier, &state);
        Self { state, sync, rng }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn device(&self) -> &Arc<dyn OutputDevice> {
        self.sync.device()
    }

    /// A handle on the queue of device notifications not yet applied.
    pub fn device_events(&self) -> Receiver<DeviceEvent> {
        self.sync.events().clone()
    }

    pub async fn handle_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::LoadPlaylist(songs) => self.load_playlist(songs).await,
            AudioCommand::Select(song) => self.select_song(song).await,
            AudioCommand::PlaySong(song) => self.play_song(song).await,
            AudioCommand::Play => self.play().await,
            AudioCommand::Pause => self.pause().await,
            AudioCommand::Toggle => self.toggle().await,
            AudioCommand::Next => self.next().await,
            AudioCommand::Previous => self.prev().await,
            AudioCommand::SetVolume(volume) => self.set_volume(volume),
            AudioCommand::ToggleMute => self.toggle_mute(),
            AudioCommand::ToggleRepeat => self.toggle_repeat(),
            AudioCommand::ToggleShuffle => self.toggle_shuffle(),
            AudioCommand::Seek(position) => self.seek(position),
            AudioCommand::SeekForward(step) => self.seek_forward(step),
            AudioCommand::SeekBackward(step) => self.seek_backward(step),
        }
    }

    pub async fn load_playlist(&mut self, songs: Vec<Song>) {
        self.dispatch(PlaybackAction::SetPlaylist(songs)).await;
    }

    pub async fn select_song(&mut self, song: Song) {
        if !self.state.playlist.is_empty() && !self.state.contains(&song) {
            warn!(id = song.id, "playback_select_unknown_song");
            return;
        }
        self.dispatch(PlaybackAction::SelectSong(song)).await;
    }

    /// Selects `song` and starts playing it.
    pub async fn play_song(&mut self, song: Song) {
        if !self.state.playlist.is_empty() && !self.state.contains(&song) {
            warn!(id = song.id, "playback_select_unknown_song");
            return;
        }
        let prev = self.state.clone();
        self.state = prev
            .apply(PlaybackAction::SelectSong(song), &mut self.rng)
            .apply(PlaybackAction::SetPlaying(true), &mut self.rng);
        self.settle(&prev).await;
    }

    pub async fn play(&mut self) {
        self.dispatch(PlaybackAction::SetPlaying(true)).await;
    }

    pub async fn pause(&mut self) {
        self.dispatch(PlaybackAction::SetPlaying(false)).await;
    }

    pub async fn toggle(&mut self) {
        self.dispatch(PlaybackAction::TogglePlaying).await;
    }

    pub async fn next(&mut self) {
        self.dispatch(PlaybackAction::Next).await;
    }

    pub async fn prev(&mut self) {
        self.dispatch(PlaybackAction::Previous).await;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.transition_levels(PlaybackAction::SetVolume(volume));
    }

    pub fn toggle_mute(&mut self) {
        self.transition_levels(PlaybackAction::ToggleMute);
    }

    pub fn toggle_repeat(&mut self) {
        self.state = self.state.apply(PlaybackAction::ToggleRepeat, &mut self.rng);
    }

    pub fn toggle_shuffle(&mut self) {
        self.state = self.state.apply(PlaybackAction::ToggleShuffle, &mut self.rng);
    }

    /// Clamped to the known duration.
    pub fn seek(&mut self, position: Duration) {
        let position = if self.state.duration.is_zero() {
            position
        } else {
            position.min(self.state.duration)
        };
        self.sync.seek(position);
        self.state = self
            .state
            .apply(PlaybackAction::SetCurrentTime(position), &mut self.rng);
    }

    pub fn seek_forward(&mut self, step: Duration) {
        self.seek(self.state.current_time.saturating_add(step));
    }

    pub fn seek_backward(&mut self, step: Duration) {
        self.seek(self.state.current_time.saturating_sub(step));
    }

    pub async fn handle_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::TimeUpdate(time) => self.on_time_update(time),
            DeviceEvent::DurationChange(duration) => self.on_duration_change(duration),
            DeviceEvent::Ended => self.on_ended().await,
        }
    }

    /// Applies every device notification that has arrived so far, in order.
    pub async fn pump_device_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.sync.events().try_recv() {
            self.handle_device_event(event).await;
            applied += 1;
        }
        applied
    }

    pub fn on_time_update(&mut self, time: Duration) {
        self.state = self
            .state
            .apply(PlaybackAction::SetCurrentTime(time), &mut self.rng);
    }

    pub fn on_duration_change(&mut self, duration: Duration) {
        self.state = self
            .state
            .apply(PlaybackAction::SetDuration(duration), &mut self.rng);
    }

    pub async fn on_ended(&mut self) {
        if self.state.current_song.is_none() || self.state.playlist.is_empty() {
            debug!("playback_ended_without_playlist");
            self.state = self
                .state
                .apply(PlaybackAction::SetPlaying(false), &mut self.rng);
            return;
        }

        if self.state.repeat {
            self.restart_current().await;
            return;
        }

        let prev = self.state.clone();
        let advanced = prev.apply(PlaybackAction::Next, &mut self.rng);
        if advanced.current_song == prev.current_song {
            self.restart_current().await;
        } else {
            self.state = advanced.apply(PlaybackAction::SetPlaying(true), &mut self.rng);
            self.settle(&prev).await;
        }
    }

    pub fn on_playback_rejected(&mut self, err: DeviceError) {
        warn!(error = %err, "playback_reverted_to_paused");
        self.state = self
            .state
            .apply(PlaybackAction::SetPlaying(false), &mut self.rng);
    }

    /// Releases the device. The controller stays readable but no longer
    /// drives or listens to anything.
    pub fn shutdown(&mut self) {
        self.sync.teardown();
    }

    async fn dispatch(&mut self, action: PlaybackAction) {
        let prev = self.state.clone();
        self.state = prev.apply(action, &mut self.rng);
        self.settle(&prev).await;
    }

    async fn settle(&mut self, prev: &PlaybackState) {
        let outcome = self.sync.reconcile(prev, &self.state).await;
        if outcome.song_loaded {
            self.state = self
                .state
                .apply(PlaybackAction::SetCurrentTime(Duration::ZERO), &mut self.rng);
        }
        if let Some(err) = outcome.rejected {
            self.on_playback_rejected(err);
        }
    }

    fn transition_levels(&mut self, action: PlaybackAction) {
        let prev = self.state.clone();
        self.state = prev.apply(action, &mut self.rng);
        self.sync.apply_levels(&prev, &self.state);
    }

    async fn restart_current(&mut self) {
        self.state = self
            .state
            .apply(PlaybackAction::SetCurrentTime(Duration::ZERO), &mut self.rng)
            .apply(PlaybackAction::SetPlaying(true), &mut self.rng);
        if let Err(err) = self.sync.restart().await {
            self.on_playback_rejected(err);
        }
    }
}
