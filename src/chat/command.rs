use thiserror::Error;

/// A parsed chat input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Me { action: Option<String> },
    Clear,
    Time,
    Status,
    Users,
    Random,
    Color { value: Option<String> },
    Unknown { keyword: String },
    /// Not a command: the line goes out as a chat message.
    Say(String),
}

/// Why a command produced an error notice instead of doing its job. The
/// display text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("{0}")]
    InvalidCommandSyntax(String),

    #[error("Unknown command: {0}. Type /help for available commands.")]
    UnknownCommand(String),
}

impl ChatCommand {
    /// `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !trimmed.starts_with('/') {
            return Some(ChatCommand::Say(line.to_string()));
        }

        let mut parts = trimmed.split_whitespace();
        let keyword = parts.next().unwrap_or_default().to_lowercase();
        let rest: Vec<&str> = parts.collect();

        let command = match keyword.as_str() {
            "/help" => ChatCommand::Help,
            "/me" => ChatCommand::Me {
                action: (!rest.is_empty()).then(|| rest.join(" ")),
            },
            "/clear" => ChatCommand::Clear,
            "/time" => ChatCommand::Time,
            "/status" => ChatCommand::Status,
            "/users" => ChatCommand::Users,
            "/random" => ChatCommand::Random,
            "/color" => ChatCommand::Color {
                value: rest.first().map(|v| v.to_string()),
            },
            _ => ChatCommand::Unknown { keyword },
        };
        Some(command)
    }
}

/// `#RRGGBB`, hex digits in either case.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Keeps ASCII letters, digits and underscores, uppercased. `None` when
/// nothing survives.
pub fn sanitize_username(raw: &str) -> Option<String> {
    let name: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_nothing() {
        assert_eq!(ChatCommand::parse(""), None);
        assert_eq!(ChatCommand::parse("   "), None);
    }

    #[test]
    fn plain_text_passes_through_unmodified() {
        assert_eq!(
            ChatCommand::parse("hello  there "),
            Some(ChatCommand::Say("hello  there ".to_string()))
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(ChatCommand::parse("/HELP"), Some(ChatCommand::Help));
        assert_eq!(ChatCommand::parse("/Users"), Some(ChatCommand::Users));
        assert_eq!(ChatCommand::parse("  /time"), Some(ChatCommand::Time));
    }

    #[test]
    fn me_collects_its_action() {
        assert_eq!(
            ChatCommand::parse("/me is   listening"),
            Some(ChatCommand::Me {
                action: Some("is listening".to_string())
            })
        );
        assert_eq!(
            ChatCommand::parse("/me"),
            Some(ChatCommand::Me { action: None })
        );
    }

    #[test]
    fn color_takes_first_argument() {
        assert_eq!(
            ChatCommand::parse("/color #00ff00 extra"),
            Some(ChatCommand::Color {
                value: Some("#00ff00".to_string())
            })
        );
        assert_eq!(
            ChatCommand::parse("/color"),
            Some(ChatCommand::Color { value: None })
        );
    }

    #[test]
    fn unknown_keyword_is_reported_lowercased() {
        assert_eq!(
            ChatCommand::parse("/Dance now"),
            Some(ChatCommand::Unknown {
                keyword: "/dance".to_string()
            })
        );
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#00ff00"));
        assert!(is_hex_color("#ABCDEF"));
        assert!(!is_hex_color("zzzzzz"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#12345G"));
        assert!(!is_hex_color("#1234567"));
    }

    #[test]
    fn usernames_are_sanitized() {
        assert_eq!(sanitize_username("neo-one_2!"), Some("NEOONE_2".to_string()));
        assert_eq!(sanitize_username("!!!"), None);
    }
}
