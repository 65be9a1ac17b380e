use crate::model::Song;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum AudioCommand {
    LoadPlaylist(Vec<Song>),
    Select(Song),
    PlaySong(Song),
    Play,
    Pause,
    Toggle,
    Next,
    Previous,
    SetVolume(f32),
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
    Seek(Duration),
    SeekForward(Duration),
    SeekBackward(Duration),
}
