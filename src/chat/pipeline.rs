use crate::chat::command::{ChatCommand, ChatError, is_hex_color, sanitize_username};
use crate::model::ChatMessage;
use crate::prefs::{COLOR_KEY, ChatPreferences, PreferenceStore, USERNAME_KEY};
use crate::stream::ChannelSession;
use chrono::{DateTime, Local, TimeZone};
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

pub const HELP_TEXT: &str =
    "Available commands: /help, /me [action], /clear, /time, /status, /users, /random, /color [hex]";
pub const STATUS_TEXT: &str = "Connection status: ONLINE - Neural link stable";

const PHRASES: [&str; 10] = [
    "The matrix has you...",
    "Welcome to the future, choom",
    "Neural link established",
    "Connecting to the Net...",
    "ICE detected - be careful",
    "Your data is now encrypted",
    "Cyber ghost in the machine",
    "The neon never sleeps",
    "Digital dreams come true",
    "Hack the planet!",
];

/// What a line of chat input turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Shown locally only.
    System(String),
    /// Goes to the channel feed under the user's name.
    Outbound { text: String, color: String },
}

/// Turns raw input into either a local notice or an outbound message.
pub struct ChatPipeline {
    store: Arc<dyn PreferenceStore>,
    prefs: ChatPreferences,
}

impl ChatPipeline {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let prefs = ChatPreferences::load(store.as_ref());
        Self { store, prefs }
    }

    pub fn username(&self) -> &str {
        &self.prefs.username
    }

    pub fn color(&self) -> &str {
        &self.prefs.color
    }

    /// `feed` is the current feed; `clear_feed` runs only for `/clear`.
    /// Returns `None` for blank input.
    pub fn process(
        &mut self,
        line: &str,
        feed: &[ChatMessage],
        clear_feed: impl FnOnce(),
    ) -> Option<ChatOutcome> {
        let command = ChatCommand::parse(line)?;
        let outcome = match self.execute(command, feed, clear_feed) {
            Ok(outcome) => outcome,
            Err(err) => ChatOutcome::System(err.to_string()),
        };
        Some(outcome)
    }

    /// Runs `line` against a live session: notices land in its feed,
    /// messages are sent through it. Nothing happens while disconnected.
    pub fn submit(&mut self, line: &str, session: &mut ChannelSession) -> Option<ChatMessage> {
        if !session.is_connected() {
            return None;
        }

        let feed = session.messages();
        let outcome = self.process(line, &feed, || session.clear_chat())?;
        match outcome {
            ChatOutcome::System(text) => Some(session.push_system_message(&text)),
            ChatOutcome::Outbound { text, color } => {
                let username = self.prefs.username.clone();
                session.send_chat_message(&text, &username, &color)
            }
        }
    }

    /// Stores a new username. Returns the notice to show, or `None` when the
    /// name has no usable characters.
    pub fn set_username(&mut self, raw: &str) -> Option<String> {
        let name = sanitize_username(raw)?;
        if let Err(err) = self.store.set(USERNAME_KEY, &name) {
            warn!(error = %err, "chat_username_not_persisted");
        }
        info!(username = name.as_str(), "chat_username_changed");
        self.prefs.username = name;
        Some(format!("Username changed to: {}", self.prefs.username))
    }

    fn execute(
        &mut self,
        command: ChatCommand,
        feed: &[ChatMessage],
        clear_feed: impl FnOnce(),
    ) -> Result<ChatOutcome, ChatError> {
        let notice = match command {
            ChatCommand::Say(text) => {
                return Ok(ChatOutcome::Outbound {
                    text,
                    color: self.prefs.color.clone(),
                });
            }
            ChatCommand::Me { action: Some(action) } => {
                return Ok(ChatOutcome::Outbound {
                    text: format!("/me {action}"),
                    color: self.prefs.color.clone(),
                });
            }
            ChatCommand::Me { action: None } => {
                return Err(ChatError::InvalidCommandSyntax(
                    "Usage: /me [action] - Example: /me is listening to music".to_string(),
                ));
            }
            ChatCommand::Help => HELP_TEXT.to_string(),
            ChatCommand::Clear => {
                clear_feed();
                "Chat history cleared".to_string()
            }
            ChatCommand::Time => format!("Current time: {}", format_time(&Local::now())),
            ChatCommand::Status => STATUS_TEXT.to_string(),
            ChatCommand::Users => format!("Active users in chat: {}", count_users(feed)),
            ChatCommand::Random => {
                let phrase = PHRASES.choose(&mut rand::rng()).copied().unwrap_or(PHRASES[0]);
                format!("Random cyberpunk phrase: \"{phrase}\"")
            }
            ChatCommand::Color { value: Some(value) } => {
                if !is_hex_color(&value) {
                    return Err(ChatError::InvalidCommandSyntax(
                        "Invalid color format. Use hex format like #FF00FF".to_string(),
                    ));
                }
                if let Err(err) = self.store.set(COLOR_KEY, &value) {
                    warn!(error = %err, "chat_color_not_persisted");
                }
                self.prefs.color = value;
                format!("Username color changed to {}", self.prefs.color)
            }
            ChatCommand::Color { value: None } => {
                format!("Current color: {}. Usage: /color #FF00FF", self.prefs.color)
            }
            ChatCommand::Unknown { keyword } => return Err(ChatError::UnknownCommand(keyword)),
        };
        Ok(ChatOutcome::System(notice))
    }
}

/// Distinct non-system authors in `feed`.
pub fn count_users(feed: &[ChatMessage]) -> usize {
    feed.iter()
        .filter(|m| !m.is_system)
        .map(|m| m.username.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// e.g. `Monday, October 19, 2026 at 14:03:05`.
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%A, %B %-d, %Y at %H:%M:%S").to_string()
}
