use crate::model::ChatMessage;
use rand::{Rng, seq::IndexedRandom};
use std::ops::Range;
use std::time::Duration;

pub const CHAT_COLORS: [&str; 6] = [
    "#FF00FF", // magenta
    "#00FFFF", // cyan
    "#FFFF00", // yellow
    "#39FF14", // green
    "#FF073A", // red
    "#BF00FF", // purple
];

const USERNAMES: [&str; 5] = [
    "CYBER_USER",
    "NEON_GHOST",
    "SYNTH_RIDER",
    "DIGITAL_SOUL",
    "MATRIX_WALKER",
];

const MESSAGES: [&str; 8] = [
    "This beat is sick! 🔥",
    "Love this cyberpunk vibe",
    "Anyone know the track name?",
    "The bass is incredible",
    "Best cyber radio station!",
    "This is my coding soundtrack",
    "Perfect for late night sessions",
    "More synthwave please!",
];

/// A listener message with sender, text and colour drawn from the fixed pools.
pub fn random_message<R: Rng + ?Sized>(rng: &mut R) -> ChatMessage {
    let username = USERNAMES.choose(rng).copied().unwrap_or(USERNAMES[0]);
    let message = MESSAGES.choose(rng).copied().unwrap_or(MESSAGES[0]);
    let color = CHAT_COLORS.choose(rng).copied().unwrap_or(CHAT_COLORS[0]);
    ChatMessage::user(username, message, color)
}

pub fn random_delay<R: Rng + ?Sized>(range: &Range<u64>, rng: &mut R) -> Duration {
    if range.is_empty() {
        Duration::from_millis(range.start)
    } else {
        Duration::from_millis(rng.random_range(range.clone()))
    }
}
