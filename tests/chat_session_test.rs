//! Chat input routed through a connected session: notices land in the feed,
//! plain text goes out under the stored username and color.

use neonwave::chat::ChatPipeline;
use neonwave::device::SimulatedDevice;
use neonwave::notify::RecordingNotifier;
use neonwave::prefs::{COLOR_KEY, MemoryPreferenceStore, PreferenceStore, USERNAME_KEY};
use neonwave::stream::{ChannelSession, find_channel};
use std::sync::Arc;
use std::time::Duration;

fn connected_session() -> ChannelSession {
    let mut session = ChannelSession::new(
        Arc::new(SimulatedDevice::new(Duration::from_secs(600))),
        Arc::new(RecordingNotifier::new()),
        50,
        50,
        3_600_000..3_600_001,
    );
    session.connect(find_channel("cyber-radio-1").expect("channel exists"));
    session
}

#[tokio::test]
async fn chosen_color_is_used_for_the_next_message() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let mut chat = ChatPipeline::new(store.clone());
    let mut session = connected_session();

    let notice = chat.submit("/color #00ff00", &mut session).expect("notice");
    assert!(notice.is_system);

    let sent = chat.submit("hello", &mut session).expect("message");
    assert_eq!(sent.color.as_deref(), Some("#00ff00"));
    assert_eq!(sent.username, "CYBER_USER");
    assert_eq!(store.get(COLOR_KEY).as_deref(), Some("#00ff00"));
}

#[tokio::test]
async fn bad_color_adds_one_notice_and_changes_nothing() {
    let mut chat = ChatPipeline::new(Arc::new(MemoryPreferenceStore::new()));
    let mut session = connected_session();
    let before = session.messages().len();

    chat.submit("/color zzzzzz", &mut session);

    let messages = session.messages();
    assert_eq!(messages.len(), before + 1);
    let notice = &messages[messages.len() - 1];
    assert!(notice.is_system);
    assert_eq!(notice.message, "Invalid color format. Use hex format like #FF00FF");
    assert_eq!(chat.color(), "#FF00FF");
}

#[tokio::test]
async fn clear_leaves_only_the_confirmation() {
    let mut chat = ChatPipeline::new(Arc::new(MemoryPreferenceStore::new()));
    let mut session = connected_session();
    chat.submit("one", &mut session);
    chat.submit("two", &mut session);

    chat.submit("/clear", &mut session);

    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message, "Chat history cleared");
}

#[tokio::test]
async fn users_counts_authors_in_the_live_feed() {
    let mut chat = ChatPipeline::new(Arc::new(MemoryPreferenceStore::new()));
    let mut session = connected_session();
    session.send_chat_message("hi", "trinity", "#FFFFFF");
    chat.submit("hey", &mut session);
    chat.submit("again", &mut session);

    let notice = chat.submit("/users", &mut session).expect("notice");
    assert_eq!(notice.message, "Active users in chat: 2");
}

#[tokio::test]
async fn me_goes_out_as_an_action() {
    let mut chat = ChatPipeline::new(Arc::new(MemoryPreferenceStore::new()));
    let mut session = connected_session();

    let sent = chat.submit("/me dances", &mut session).expect("message");
    assert!(!sent.is_system);
    assert_eq!(sent.message, "/me dances");
}

#[tokio::test]
async fn nothing_happens_while_disconnected() {
    let mut chat = ChatPipeline::new(Arc::new(MemoryPreferenceStore::new()));
    let mut session = connected_session();
    session.disconnect();

    assert!(chat.submit("/help", &mut session).is_none());
    assert!(chat.submit("hello", &mut session).is_none());
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn stored_preferences_are_picked_up() {
    let store = Arc::new(MemoryPreferenceStore::new());
    store.set(USERNAME_KEY, "MORPHEUS").expect("stored");
    store.set(COLOR_KEY, "#123456").expect("stored");

    let mut chat = ChatPipeline::new(store);
    let mut session = connected_session();
    let sent = chat.submit("wake up", &mut session).expect("message");

    assert_eq!(sent.username, "MORPHEUS");
    assert_eq!(sent.color.as_deref(), Some("#123456"));
}
