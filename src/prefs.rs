use crate::chat::command::{is_hex_color, sanitize_username};
use crate::util::lock;
use directories::ProjectDirs;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

pub const USERNAME_KEY: &str = "chat_username";
pub const COLOR_KEY: &str = "chat_color";
pub const DEFAULT_USERNAME: &str = "CYBER_USER";
pub const DEFAULT_COLOR: &str = "#FF00FF";

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Preference file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("No configuration directory available")]
    NoConfigDir,
}

/// Small key-value persistence for user preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept in a JSON object on disk, rewritten on every change.
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    pub fn default_path() -> Result<PathBuf, PreferenceError> {
        let dirs = ProjectDirs::from("dev", "neonwave", "neonwave").ok_or(PreferenceError::NoConfigDir)?;
        Ok(dirs.config_dir().join("preferences.json"))
    }

    pub fn open_default() -> Result<Self, PreferenceError> {
        Self::open(Self::default_path()?)
    }

    /// A missing file is an empty store; an unreadable one is logged and
    /// treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(body) => serde_json::from_str(&body).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "preferences_corrupt_ignored");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&*values)?)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Username and chat colour, read once when a chat session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPreferences {
    pub username: String,
    pub color: String,
}

impl Default for ChatPreferences {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl ChatPreferences {
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let username = store
            .get(USERNAME_KEY)
            .and_then(|name| sanitize_username(&name))
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let color = store
            .get(COLOR_KEY)
            .filter(|color| is_hex_color(color))
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());

        Self { username, color }
    }
}
