/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Help,
    Quit,
    Status,

    // Playback
    List,
    Select(usize),
    Play,
    Pause,
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    SetVolume(f32),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
    Seek(u64),
    SeekForward,
    SeekBackward,

    // Channel
    Channels,
    Connect(String),
    StartStream,
    StopStream,
    StreamVolume(u8),
    ToggleStreamMute,
    Disconnect,
    Chat,
    Say(String),
    Rename(String),

    Invalid(String),
}

pub struct InputHandler;

impl InputHandler {
    pub fn handle_line(line: &str) -> Option<AppMessage> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let message = match (word.to_lowercase().as_str(), rest) {
            ("help" | "?", _) => AppMessage::Help,
            ("quit" | "exit" | "q", _) => AppMessage::Quit,
            ("status" | "st", _) => AppMessage::Status,
            ("list" | "ls", _) => AppMessage::List,
            ("select" | "sel", n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => AppMessage::Select(n - 1),
                _ => AppMessage::Invalid("usage: select <number>".to_string()),
            },
            ("play", _) => AppMessage::Play,
            ("pause", _) => AppMessage::Pause,
            ("toggle" | "t", _) => AppMessage::TogglePlayPause,
            ("next" | "n", _) => AppMessage::NextTrack,
            ("prev" | "p", _) => AppMessage::PreviousTrack,
            ("vol" | "volume", "+") => AppMessage::VolumeUp,
            ("vol" | "volume", "-") => AppMessage::VolumeDown,
            ("vol" | "volume", v) => match v.parse::<f32>() {
                Ok(v) => AppMessage::SetVolume(v),
                Err(_) => AppMessage::Invalid("usage: vol <0.0-1.0|+|->".to_string()),
            },
            ("mute" | "m", _) => AppMessage::ToggleMute,
            ("repeat" | "r", _) => AppMessage::ToggleRepeat,
            ("shuffle" | "s", _) => AppMessage::ToggleShuffle,
            ("seek", secs) => match secs.parse::<u64>() {
                Ok(secs) => AppMessage::Seek(secs),
                Err(_) => AppMessage::Invalid("usage: seek <seconds>".to_string()),
            },
            ("ff", _) => AppMessage::SeekForward,
            ("rew", _) => AppMessage::SeekBackward,
            ("channels", _) => AppMessage::Channels,
            ("connect", "") => AppMessage::Invalid("usage: connect <channel id>".to_string()),
            ("connect", id) => AppMessage::Connect(id.to_string()),
            ("start", _) => AppMessage::StartStream,
            ("stop", _) => AppMessage::StopStream,
            ("svol", v) => match v.parse::<i64>() {
                Ok(v) => AppMessage::StreamVolume(v.clamp(0, 100) as u8),
                Err(_) => AppMessage::Invalid("usage: svol <0-100>".to_string()),
            },
            ("smute", _) => AppMessage::ToggleStreamMute,
            ("disconnect" | "dc", _) => AppMessage::Disconnect,
            ("chat", _) => AppMessage::Chat,
            ("say", text) => AppMessage::Say(text.to_string()),
            ("name", "") => AppMessage::Invalid("usage: name <username>".to_string()),
            ("name", name) => AppMessage::Rename(name.to_string()),
            _ if line.starts_with('/') => AppMessage::Say(line.to_string()),
            (other, _) => AppMessage::Invalid(format!("unknown command '{other}', try 'help'")),
        };
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_player_controls() {
        assert_eq!(InputHandler::handle_line("n"), Some(AppMessage::NextTrack));
        assert_eq!(InputHandler::handle_line("vol 0.4"), Some(AppMessage::SetVolume(0.4)));
        assert_eq!(InputHandler::handle_line("select 2"), Some(AppMessage::Select(1)));
        assert!(matches!(InputHandler::handle_line("select 0"), Some(AppMessage::Invalid(_))));
    }

    #[test]
    fn maps_channel_controls() {
        assert_eq!(
            InputHandler::handle_line("connect neon-beats"),
            Some(AppMessage::Connect("neon-beats".to_string()))
        );
        assert_eq!(InputHandler::handle_line("svol 250"), Some(AppMessage::StreamVolume(100)));
        assert_eq!(InputHandler::handle_line("svol -3"), Some(AppMessage::StreamVolume(0)));
    }

    #[test]
    fn slash_lines_go_to_chat() {
        assert_eq!(
            InputHandler::handle_line("/color #00ff00"),
            Some(AppMessage::Say("/color #00ff00".to_string()))
        );
        assert_eq!(
            InputHandler::handle_line("say hello there"),
            Some(AppMessage::Say("hello there".to_string()))
        );
    }

    #[test]
    fn blank_is_ignored() {
        assert_eq!(InputHandler::handle_line("   "), None);
    }
}
