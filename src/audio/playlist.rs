use crate::audio::error::LoadError;
use crate::audio::traits::{NotificationKind, NotificationSink, PlaylistLoader};
use crate::model::Song;
use async_trait::async_trait;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

lazy_static! {
    static ref DEFAULT_PLAYLIST: Vec<Song> = vec![
        song(1, "Neon Skyline", "SoundHelix", 1, 372.0),
        song(2, "Chrome Rain", "SoundHelix", 2, 425.0),
        song(3, "Night City Drive", "SoundHelix", 3, 344.0),
        song(4, "Synthetic Dawn", "SoundHelix", 4, 302.0),
        song(5, "Grid Runner", "SoundHelix", 5, 353.0),
    ];
}

fn song(id: u32, title: &str, artist: &str, track: u32, duration: f64) -> Song {
    Song {
        id,
        title: title.to_string(),
        artist: artist.to_string(),
        audio_src: format!("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-{track}.mp3"),
        cover: None,
        duration,
    }
}

/// The playlist used when nothing else is configured or loading fails.
pub fn default_playlist() -> Vec<Song> {
    DEFAULT_PLAYLIST.clone()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlaylistDocument {
    Songs(Vec<Song>),
    Wrapped { songs: Vec<Song> },
}

/// Parses a playlist document: either a bare array of songs or an object with
/// a `songs` array.
pub fn parse_playlist(body: &str) -> Result<Vec<Song>, LoadError> {
    let songs = match serde_json::from_str::<PlaylistDocument>(body)? {
        PlaylistDocument::Songs(songs) | PlaylistDocument::Wrapped { songs } => songs,
    };
    validate(songs)
}

fn validate(songs: Vec<Song>) -> Result<Vec<Song>, LoadError> {
    if songs.is_empty() {
        return Err(LoadError::Malformed("playlist contains no songs".to_string()));
    }

    let mut ids = HashSet::new();
    for song in &songs {
        if !ids.insert(song.id) {
            return Err(LoadError::Malformed(format!("duplicate song id {}", song.id)));
        }
        if song.audio_src.trim().is_empty() {
            return Err(LoadError::Malformed(format!("song {} has no audioSrc", song.id)));
        }
    }
    Ok(songs)
}

/// Loads JSON playlists over HTTP(S) or from the local filesystem. Without a
/// location it hands out the built-in playlist.
pub struct JsonPlaylistLoader {
    client: reqwest::Client,
}

impl JsonPlaylistLoader {
    pub fn new(timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<String, LoadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PlaylistLoader for JsonPlaylistLoader {
    async fn load(&self, url: Option<&str>) -> Result<Vec<Song>, LoadError> {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(default_playlist());
        };

        let body = if url.starts_with("http://") || url.starts_with("https://") {
            self.fetch(url).await?
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            tokio::fs::read_to_string(path).await?
        };

        parse_playlist(&body)
    }
}

/// Loads from `url`, falling back to the built-in playlist on failure. The
/// outcome is always reported through `notifier`.
pub async fn load_playlist_or_default(
    loader: &dyn PlaylistLoader,
    url: Option<&str>,
    notifier: &dyn NotificationSink,
) -> Vec<Song> {
    match loader.load(url).await {
        Ok(songs) => {
            info!(count = songs.len(), "playlist_loaded");
            if !songs.is_empty() {
                notifier.notify(
                    NotificationKind::Info,
                    "Playlist loaded",
                    &format!("{} songs loaded successfully.", songs.len()),
                );
            }
            songs
        }
        Err(err) => {
            warn!(error = %err, "playlist_load_failed_using_default");
            notifier.notify(
                NotificationKind::Error,
                "Could not load songs",
                "The playlist could not be loaded. The default playlist will be used.",
            );
            default_playlist()
        }
    }
}
