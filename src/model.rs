use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SYSTEM_USERNAME: &str = "SYSTEM";
pub const SYSTEM_COLOR: &str = "#00FFFF";

/// A playable entry of a playlist. Two songs are the same song when their ids match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: u32,
    pub title: String,
    pub artist: String,
    pub audio_src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Length in seconds as advertised by the playlist.
    #[serde(default)]
    pub duration: f64,
}

impl Song {
    pub fn length(&self) -> Duration {
        if self.duration.is_finite() && self.duration > 0.0 {
            Duration::from_secs_f64(self.duration)
        } else {
            Duration::ZERO
        }
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_live: bool,
    pub stream_url: String,
    pub thumbnail_url: String,
    pub current_listeners: u32,
    pub category: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub is_system: bool,
    pub color: Option<String>,
}

impl ChatMessage {
    pub fn user(username: impl Into<String>, message: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            message: message.into(),
            timestamp: Local::now(),
            is_system: false,
            color: Some(color.into()),
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: SYSTEM_USERNAME.to_string(),
            message: message.into(),
            timestamp: Local::now(),
            is_system: true,
            color: Some(SYSTEM_COLOR.to_string()),
        }
    }
}
