//! Property-based tests for the pure playback transitions and the chat feed.

use neonwave::audio::state::{PlaybackAction, PlaybackState};
use neonwave::model::{ChatMessage, Song};
use neonwave::stream::ChatFeed;
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

fn playlist(n: u32) -> Vec<Song> {
    (1..=n)
        .map(|id| Song {
            id,
            title: format!("Song {id}"),
            artist: "Artist".to_string(),
            audio_src: format!("mem://{id}"),
            cover: None,
            duration: 120.0,
        })
        .collect()
}

fn loaded(n: u32) -> PlaybackState {
    PlaybackState::default().apply(PlaybackAction::SetPlaylist(playlist(n)), &mut StdRng::seed_from_u64(0))
}

fn action_strategy() -> impl Strategy<Value = PlaybackAction> {
    prop_oneof![
        Just(PlaybackAction::Next),
        Just(PlaybackAction::Previous),
        Just(PlaybackAction::TogglePlaying),
        Just(PlaybackAction::ToggleMute),
        Just(PlaybackAction::ToggleRepeat),
        Just(PlaybackAction::ToggleShuffle),
        (-2.0f32..3.0).prop_map(PlaybackAction::SetVolume),
        (1u32..20).prop_map(|id| PlaybackAction::SelectSong(playlist(id).remove(id as usize - 1))),
    ]
}

proptest! {
    #[test]
    fn next_n_times_comes_back_around(n in 1u32..30, start in 0usize..30) {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = loaded(n);
        let start = playlist(n)[start % n as usize].clone();
        state = state.apply(PlaybackAction::SelectSong(start.clone()), &mut rng);

        for _ in 0..n {
            state = state.apply(PlaybackAction::Next, &mut rng);
        }

        prop_assert_eq!(state.current_song.map(|s| s.id), Some(start.id));
    }

    #[test]
    fn previous_undoes_next_in_order(n in 1u32..30, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = loaded(n);
        let back = state
            .apply(PlaybackAction::Next, &mut rng)
            .apply(PlaybackAction::Previous, &mut rng);
        prop_assert_eq!(back.current_song, state.current_song);
    }

    #[test]
    fn shuffle_never_repeats_the_current_song(n in 2u32..30, seed in any::<u64>(), steps in 1usize..40) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = loaded(n).apply(PlaybackAction::ToggleShuffle, &mut rng);

        for _ in 0..steps {
            let before = state.current_song.as_ref().map(|s| s.id);
            state = state.apply(PlaybackAction::Next, &mut rng);
            let after = state.current_song.as_ref().map(|s| s.id);
            prop_assert_ne!(before, after);
            prop_assert!(after.is_some_and(|id| id >= 1 && id <= n));
        }
    }

    #[test]
    fn invariants_hold_under_any_action_sequence(
        n in 1u32..20,
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 0..60),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = loaded(n);

        for action in actions {
            state = state.apply(action, &mut rng);
            prop_assert!((0.0..=1.0).contains(&state.volume));
            prop_assert!(state.current_song.is_some());
            prop_assert!(state.current_index().is_some());
            prop_assert_eq!(state.playlist.len(), n as usize);
        }
    }

    #[test]
    fn feed_keeps_the_newest_in_order(pushed in 0usize..200, capacity in 1usize..80) {
        let mut feed = ChatFeed::new(capacity);
        for i in 0..pushed {
            feed.push(ChatMessage::user("NEO", i.to_string(), "#FFFFFF"));
        }

        prop_assert_eq!(feed.len(), pushed.min(capacity));
        let expected: Vec<String> = (pushed.saturating_sub(capacity)..pushed).map(|i| i.to_string()).collect();
        let actual: Vec<String> = feed.iter().map(|m| m.message.clone()).collect();
        prop_assert_eq!(actual, expected);
    }
}
