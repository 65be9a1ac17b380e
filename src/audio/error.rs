use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    #[error("Playback rejected by output device: {0}")]
    PlaybackRejected(String),

    #[error("Output device has no source assigned")]
    NoSource,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Playlist source unreachable: {0}")]
    Unreachable(String),

    #[error("Playlist source answered with status {0}")]
    Status(u16),

    #[error("Malformed playlist: {0}")]
    Malformed(String),

    #[error("Playlist file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LoadError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            LoadError::Status(status.as_u16())
        } else {
            LoadError::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}
