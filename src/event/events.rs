use crate::audio::traits::NotificationKind;
use crate::model::Song;

#[derive(Debug, Clone)]
pub enum Event {
    // Input
    Input(String),
    InputClosed,

    // Background results
    PlaylistLoaded(Vec<Song>),
    Notification {
        kind: NotificationKind,
        title: String,
        body: String,
    },
}
