//! Channel session lifecycle against the simulated device.
//!
//! Time is paused in every timing-sensitive test so chatter delays elapse
//! instantly and deterministically.

use neonwave::audio::traits::NotificationKind;
use neonwave::device::{DeviceCall, SimulatedDevice};
use neonwave::notify::RecordingNotifier;
use neonwave::stream::{ChannelSession, SessionPhase, find_channel};
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

// ===== Helpers =====

const QUIET: Range<u64> = 3_600_000..3_600_001;
const CHATTY: Range<u64> = 100..200;

fn session(delay_ms: Range<u64>) -> (ChannelSession, Arc<SimulatedDevice>, Arc<RecordingNotifier>) {
    let device = Arc::new(SimulatedDevice::new(Duration::from_secs(600)));
    let notifier = Arc::new(RecordingNotifier::new());
    let session = ChannelSession::new(device.clone(), notifier.clone(), 50, 50, delay_ms);
    (session, device, notifier)
}

fn connected(delay_ms: Range<u64>) -> (ChannelSession, Arc<SimulatedDevice>, Arc<RecordingNotifier>) {
    let (mut session, device, notifier) = session(delay_ms);
    session.connect(find_channel("cyber-radio-1").expect("channel exists"));
    (session, device, notifier)
}

// ===== Connect =====

#[tokio::test]
async fn starts_idle_with_device_at_initial_level() {
    let (session, device, _) = session(QUIET);
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.messages().is_empty());
    assert!((device.volume() - 0.5).abs() < f32::EPSILON);
}

#[tokio::test]
async fn connect_binds_device_and_greets() {
    let (session, device, _) = connected(QUIET);

    assert_eq!(session.phase(), SessionPhase::Connected);
    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_system);
    assert_eq!(messages[0].message, "Connected to CYBER RADIO ONE");
    assert_eq!(
        device.source().as_deref(),
        Some("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3")
    );
    assert!(session.is_chatter_armed());
    assert!(!device.is_playing());
}

#[tokio::test]
async fn connecting_elsewhere_replaces_the_session() {
    let (mut session, device, _) = connected(QUIET);
    session.start().await;
    session.send_chat_message("hello", "neo", "#FFFFFF");

    session.connect(find_channel("neon-beats").expect("channel exists"));

    let state = session.snapshot();
    assert_eq!(state.phase(), SessionPhase::Connected);
    assert_eq!(state.current_channel.map(|c| c.id).as_deref(), Some("neon-beats"));
    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message, "Connected to NEON BEATS");
    assert!(!device.is_playing());
    assert!(device.calls().contains(&DeviceCall::SetSource(None)));
}

// ===== Start / stop =====

#[tokio::test]
async fn start_and_stop_follow_the_device() {
    let (mut session, device, _) = connected(QUIET);

    session.start().await;
    assert_eq!(session.phase(), SessionPhase::Streaming);
    assert!(device.is_playing());

    session.stop();
    assert_eq!(session.phase(), SessionPhase::Connected);
    assert!(!device.is_playing());
}

#[tokio::test]
async fn rejected_start_stays_connected_and_notifies() {
    let (mut session, device, notifier) = connected(QUIET);
    device.set_play_allowed(false);

    session.start().await;

    assert_eq!(session.phase(), SessionPhase::Connected);
    assert_eq!(notifier.count(NotificationKind::Error), 1);
    assert_eq!(notifier.received()[0].1, "Stream error");
}

#[tokio::test]
async fn start_while_idle_does_nothing() {
    let (mut session, device, notifier) = session(QUIET);
    session.start().await;
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(!device.calls().contains(&DeviceCall::Play));
    assert!(notifier.received().is_empty());
}

// ===== Volume =====

#[tokio::test]
async fn volume_is_capped_and_unmutes() {
    let (mut session, device, _) = connected(QUIET);

    session.toggle_mute();
    assert!(session.snapshot().is_muted);
    assert_eq!(device.volume(), 0.0);

    session.set_volume(30);
    assert!(!session.snapshot().is_muted);
    assert!((device.volume() - 0.3).abs() < f32::EPSILON);

    session.set_volume(180);
    assert_eq!(session.snapshot().volume, 100);
    assert_eq!(device.volume(), 1.0);
}

#[tokio::test]
async fn zero_volume_leaves_mute_alone() {
    let (mut session, _, _) = connected(QUIET);
    session.toggle_mute();
    session.set_volume(0);
    assert!(session.snapshot().is_muted);
}

// ===== Chatter =====

#[tokio::test(start_paused = true)]
async fn chatter_arrives_while_connected() {
    let (session, _, _) = connected(CHATTY);

    tokio::time::sleep(Duration::from_secs(1)).await;

    let messages = session.messages();
    assert!(messages.len() >= 5, "only {} messages", messages.len());
    assert!(messages[1..].iter().all(|m| !m.is_system));
}

#[tokio::test(start_paused = true)]
async fn no_chatter_after_disconnect() {
    let (mut session, device, _) = connected(CHATTY);
    tokio::time::sleep(Duration::from_millis(450)).await;

    session.disconnect();
    assert!(!session.is_chatter_armed());
    tokio::time::sleep(Duration::from_secs(20)).await;

    let state = session.snapshot();
    assert_eq!(state.phase(), SessionPhase::Idle);
    assert!(state.current_channel.is_none());
    assert!(state.chat_messages.is_empty());
    assert_eq!(device.source(), None);
}

#[tokio::test(start_paused = true)]
async fn disconnect_is_idempotent() {
    let (mut session, device, _) = connected(QUIET);
    session.disconnect();
    let calls = device.calls().len();

    session.disconnect();

    assert_eq!(device.calls().len(), calls);
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn disconnect_keeps_volume_settings() {
    let (mut session, _, _) = connected(QUIET);
    session.set_volume(80);
    session.toggle_mute();
    session.disconnect();

    let state = session.snapshot();
    assert_eq!(state.volume, 80);
    assert!(state.is_muted);
}

// ===== Chat =====

#[tokio::test]
async fn outgoing_messages_are_trimmed_and_attributed() {
    let (mut session, _, _) = connected(QUIET);

    let sent = session
        .send_chat_message("  hello there  ", "neo_1", "#00FF00")
        .expect("sent");

    assert_eq!(sent.username, "NEO_1");
    assert_eq!(sent.message, "hello there");
    assert_eq!(sent.color.as_deref(), Some("#00FF00"));
    assert!(!sent.is_system);
    assert_eq!(session.messages().last(), Some(&sent));
}

#[tokio::test]
async fn blank_or_offline_messages_are_dropped() {
    let (mut session, _, _) = session(QUIET);
    assert!(session.send_chat_message("hello", "neo", "#FFFFFF").is_none());

    session.connect(find_channel("neon-beats").expect("channel exists"));
    assert!(session.send_chat_message("   ", "neo", "#FFFFFF").is_none());
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test]
async fn feed_keeps_only_the_newest_fifty() {
    let (mut session, _, _) = connected(QUIET);

    for i in 0..60 {
        session.send_chat_message(&format!("msg {i}"), "neo", "#FFFFFF");
    }

    let messages = session.messages();
    assert_eq!(messages.len(), 50);
    assert_eq!(messages[0].message, "msg 10");
    assert_eq!(messages[49].message, "msg 59");
}

#[tokio::test]
async fn clear_chat_empties_the_feed() {
    let (mut session, _, _) = connected(QUIET);
    session.send_chat_message("one", "neo", "#FFFFFF");
    session.clear_chat();
    assert!(session.messages().is_empty());
    assert!(session.is_connected());
}
