use crate::model::Song;
use rand::{Rng, seq::IndexedRandom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Picks the song that navigation in `direction` lands on, or `None` when
/// navigation is a no-op (no current song, empty playlist, or a shuffled
/// playlist with nothing else to pick).
pub fn navigate<R: Rng + ?Sized>(
    playlist: &[Song],
    current: Option<&Song>,
    shuffle: bool,
    direction: Direction,
    rng: &mut R,
) -> Option<Song> {
    let current = current?;
    if playlist.is_empty() {
        return None;
    }

    if shuffle {
        let candidates: Vec<&Song> = playlist.iter().filter(|s| s.id != current.id).collect();
        return candidates.choose(rng).map(|song| (*song).clone());
    }

    let len = playlist.len();
    let index = match (position_of(playlist, current), direction) {
        (Some(i), Direction::Forward) => (i + 1) % len,
        (Some(i), Direction::Backward) => (i + len - 1) % len,
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => len - 1,
    };
    playlist.get(index).cloned()
}

pub fn position_of(playlist: &[Song], song: &Song) -> Option<usize> {
    playlist.iter().position(|s| s.id == song.id)
}
