use crate::audio::queue::{self, Direction};
use crate::model::Song;
use rand::Rng;
use std::time::Duration;

pub const DEFAULT_VOLUME: f32 = 0.7;

/// Everything the player knows about playback. Only [`PlaybackState::apply`]
/// changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_song: Option<Song>,
    pub playlist: Vec<Song>,
    pub is_playing: bool,
    pub is_muted: bool,
    pub volume: f32,
    pub current_time: Duration,
    pub duration: Duration,
    pub repeat: bool,
    pub shuffle: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_song: None,
            playlist: Vec::new(),
            is_playing: false,
            is_muted: false,
            volume: DEFAULT_VOLUME,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
            repeat: false,
            shuffle: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackAction {
    SetPlaylist(Vec<Song>),
    SelectSong(Song),
    SetPlaying(bool),
    TogglePlaying,
    SetVolume(f32),
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
    SetCurrentTime(Duration),
    SetDuration(Duration),
    Next,
    Previous,
}

impl PlaybackState {
    pub fn with_volume(volume: f32) -> Self {
        Self::default().apply(PlaybackAction::SetVolume(volume), &mut rand::rng())
    }

    /// Output level the device should be driven at.
    pub fn output_level(&self) -> f32 {
        if self.is_muted { 0.0 } else { self.volume }
    }

    pub fn contains(&self, song: &Song) -> bool {
        queue::position_of(&self.playlist, song).is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_song
            .as_ref()
            .and_then(|song| queue::position_of(&self.playlist, song))
    }

    pub fn apply<R: Rng + ?Sized>(&self, action: PlaybackAction, rng: &mut R) -> Self {
        let mut next = self.clone();
        match action {
            PlaybackAction::SetPlaylist(songs) => {
                let songs = dedup_by_id(songs);
                let keeps_current = next
                    .current_song
                    .as_ref()
                    .is_some_and(|song| queue::position_of(&songs, song).is_some());
                if !keeps_current && !songs.is_empty() {
                    next.current_song = songs.first().cloned();
                }
                next.playlist = songs;
            }
            PlaybackAction::SelectSong(song) => {
                if next.playlist.is_empty() || next.contains(&song) {
                    next.current_song = Some(song);
                }
            }
            // Nothing to play without a current song.
            PlaybackAction::SetPlaying(playing) => {
                next.is_playing = playing && next.current_song.is_some();
            }
            PlaybackAction::TogglePlaying => {
                next.is_playing = !next.is_playing && next.current_song.is_some();
            }
            PlaybackAction::SetVolume(volume) => {
                if !volume.is_nan() {
                    next.volume = volume.clamp(0.0, 1.0);
                    if volume > 0.0 && next.is_muted {
                        next.is_muted = false;
                    }
                }
            }
            PlaybackAction::ToggleMute => next.is_muted = !next.is_muted,
            PlaybackAction::ToggleRepeat => next.repeat = !next.repeat,
            PlaybackAction::ToggleShuffle => next.shuffle = !next.shuffle,
            PlaybackAction::SetCurrentTime(time) => next.current_time = time,
            PlaybackAction::SetDuration(duration) => next.duration = duration,
            PlaybackAction::Next => {
                if let Some(song) = queue::navigate(
                    &next.playlist,
                    next.current_song.as_ref(),
                    next.shuffle,
                    Direction::Forward,
                    rng,
                ) {
                    next.current_song = Some(song);
                }
            }
            PlaybackAction::Previous => {
                if let Some(song) = queue::navigate(
                    &next.playlist,
                    next.current_song.as_ref(),
                    next.shuffle,
                    Direction::Backward,
                    rng,
                ) {
                    next.current_song = Some(song);
                }
            }
        }
        next
    }
}

fn dedup_by_id(songs: Vec<Song>) -> Vec<Song> {
    let mut seen = std::collections::HashSet::new();
    songs.into_iter().filter(|song| seen.insert(song.id)).collect()
}
