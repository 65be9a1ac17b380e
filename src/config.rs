use std::ops::Range;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub playlist_url: Option<String>,
    pub playlist_timeout: Duration,
    /// Playback volume, `0.0..=1.0`.
    pub volume: f32,
    pub volume_step: f32,
    /// Channel volume, `0..=100`.
    pub stream_volume: u8,
    pub seek_step_secs: u64,
    pub chatter_delay_ms: Range<u64>,
    pub feed_capacity: usize,
    pub simulated_track_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playlist_url: None,
            playlist_timeout: Duration::from_secs(10),
            volume: 0.7,
            volume_step: 0.05,
            stream_volume: 50,
            seek_step_secs: 5,
            chatter_delay_ms: 3000..10000,
            feed_capacity: 50,
            simulated_track_secs: 30,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `NEONWAVE_*` variables (a `.env` file is honoured).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("NEONWAVE_PLAYLIST_URL").filter(|u| !u.trim().is_empty()) {
            config.playlist_url = Some(url);
        }
        if let Some(volume) = parse::<f32>(&lookup, "NEONWAVE_VOLUME") {
            config.volume = volume.clamp(0.0, 1.0);
        }
        if let Some(volume) = parse::<u8>(&lookup, "NEONWAVE_STREAM_VOLUME") {
            config.stream_volume = volume.min(100);
        }
        if let Some(secs) = parse::<u64>(&lookup, "NEONWAVE_TRACK_SECS") {
            config.simulated_track_secs = secs.max(1);
        }

        let min = parse::<u64>(&lookup, "NEONWAVE_CHATTER_MIN_MS").unwrap_or(config.chatter_delay_ms.start);
        let max = parse::<u64>(&lookup, "NEONWAVE_CHATTER_MAX_MS").unwrap_or(config.chatter_delay_ms.end);
        if min < max {
            config.chatter_delay_ms = min..max;
        } else {
            warn!(min, max, "config_chatter_range_ignored");
        }

        config
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = raw.as_str(), "config_value_ignored");
            None
        }
    }
}
