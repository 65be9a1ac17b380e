use std::sync::Arc;
use std::time::Duration;

use flume::{Receiver, Sender};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::{
    audio::{
        commands::AudioCommand,
        controller::PlaybackController,
        playlist::{self, JsonPlaylistLoader},
        state::PlaybackState,
        traits::{NotificationKind, NotificationSink},
    },
    chat::ChatPipeline,
    config::AppConfig,
    device::SimulatedDevice,
    event::events::Event,
    input::{AppMessage, InputHandler},
    notify::BusNotifier,
    prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore},
    stream::{self, ChannelSession},
    util::task::TaskManager,
};

const HELP: &str = "\
player : list | select <n> | play | pause | toggle | next | prev | vol <0-1|+|-> | mute
         repeat | shuffle | seek <secs> | ff | rew | status
channel: channels | connect <id> | start | stop | svol <0-100> | smute | disconnect
chat   : say <text> | /<command> | chat | name <username>
         quit";

pub struct App {
    pub event_rx: Receiver<Event>,
    pub event_tx: Sender<Event>,
    pub config: AppConfig,
    pub player: PlaybackController,
    pub session: ChannelSession,
    pub chat: ChatPipeline,
    notifier: Arc<dyn NotificationSink>,
    tasks: TaskManager,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> color_eyre::Result<Self> {
        let store: Arc<dyn PreferenceStore> = match FilePreferenceStore::open_default() {
            Ok(store) => Arc::new(store),
            Err(err) => {
                warn!(error = %err, "preferences_unavailable_using_memory");
                Arc::new(MemoryPreferenceStore::new())
            }
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn PreferenceStore>) -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        let notifier: Arc<dyn NotificationSink> = Arc::new(BusNotifier::new(event_tx.clone()));
        let track_length = Duration::from_secs(config.simulated_track_secs);

        let player = PlaybackController::new(
            Arc::new(SimulatedDevice::new(track_length)),
            notifier.clone(),
            config.volume,
        );
        let session = ChannelSession::new(
            Arc::new(SimulatedDevice::new(track_length)),
            notifier.clone(),
            config.stream_volume,
            config.feed_capacity,
            config.chatter_delay_ms.clone(),
        );
        let chat = ChatPipeline::new(store);

        Self {
            event_rx,
            event_tx,
            config,
            player,
            session,
            chat,
            notifier,
            tasks: TaskManager::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        self.spawn_input_reader();
        self.spawn_playlist_load();

        println!("neonwave - type 'help' for commands");
        let device_rx = self.player.device_events();

        while !self.should_quit {
            tokio::select! {
                Ok(evt) = self.event_rx.recv_async() => self.handle_event(evt).await,
                Ok(evt) = device_rx.recv_async() => self.player.handle_device_event(evt).await,
                else => break,
            }
        }

        self.shutdown();
        Ok(())
    }

    fn spawn_input_reader(&mut self) {
        let tx = self.event_tx.clone();
        self.tasks.spawn(
            "input",
            tokio::spawn(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tx.send_async(Event::Input(line)).await.is_err() {
                        return;
                    }
                }
                let _ = tx.send_async(Event::InputClosed).await;
            }),
        );
    }

    fn spawn_playlist_load(&mut self) {
        let tx = self.event_tx.clone();
        let notifier = self.notifier.clone();
        let url = self.config.playlist_url.clone();
        let timeout = self.config.playlist_timeout;

        self.tasks.spawn(
            "playlist",
            tokio::spawn(async move {
                let songs = match JsonPlaylistLoader::new(timeout) {
                    Ok(loader) => {
                        playlist::load_playlist_or_default(&loader, url.as_deref(), notifier.as_ref())
                            .await
                    }
                    Err(err) => {
                        warn!(error = %err, "playlist_loader_unavailable");
                        notifier.notify(
                            NotificationKind::Error,
                            "Could not load songs",
                            "The playlist could not be loaded. The default playlist will be used.",
                        );
                        playlist::default_playlist()
                    }
                };
                let _ = tx.send_async(Event::PlaylistLoaded(songs)).await;
            }),
        );
    }

    pub async fn handle_event(&mut self, evt: Event) {
        match evt {
            Event::Input(line) => {
                if let Some(message) = InputHandler::handle_line(&line) {
                    self.handle_message(message).await;
                }
            }
            Event::InputClosed => self.should_quit = true,
            Event::PlaylistLoaded(songs) => {
                self.player
                    .handle_command(AudioCommand::LoadPlaylist(songs))
                    .await;
            }
            Event::Notification { kind, title, body } => {
                let tag = match kind {
                    NotificationKind::Info => "info",
                    NotificationKind::Error => "error",
                };
                println!("[{tag}] {title}: {body}");
            }
        }
    }

    pub async fn handle_message(&mut self, message: AppMessage) {
        let seek_step = Duration::from_secs(self.config.seek_step_secs);
        let command = match message {
            AppMessage::Help => {
                println!("{HELP}");
                None
            }
            AppMessage::Quit => {
                self.should_quit = true;
                None
            }
            AppMessage::Status => {
                println!("{}", describe_player(self.player.state()));
                println!("{}", self.describe_session());
                None
            }
            AppMessage::List => {
                self.print_playlist();
                None
            }
            AppMessage::Select(index) => match self.player.state().playlist.get(index) {
                Some(song) => Some(AudioCommand::PlaySong(song.clone())),
                None => {
                    println!("no song #{}", index + 1);
                    None
                }
            },
            AppMessage::Play => Some(AudioCommand::Play),
            AppMessage::Pause => Some(AudioCommand::Pause),
            AppMessage::TogglePlayPause => Some(AudioCommand::Toggle),
            AppMessage::NextTrack => Some(AudioCommand::Next),
            AppMessage::PreviousTrack => Some(AudioCommand::Previous),
            AppMessage::SetVolume(volume) => Some(AudioCommand::SetVolume(volume)),
            AppMessage::VolumeUp => Some(AudioCommand::SetVolume(
                self.player.state().volume + self.config.volume_step,
            )),
            AppMessage::VolumeDown => Some(AudioCommand::SetVolume(
                self.player.state().volume - self.config.volume_step,
            )),
            AppMessage::ToggleMute => Some(AudioCommand::ToggleMute),
            AppMessage::ToggleRepeat => Some(AudioCommand::ToggleRepeat),
            AppMessage::ToggleShuffle => Some(AudioCommand::ToggleShuffle),
            AppMessage::Seek(secs) => Some(AudioCommand::Seek(Duration::from_secs(secs))),
            AppMessage::SeekForward => Some(AudioCommand::SeekForward(seek_step)),
            AppMessage::SeekBackward => Some(AudioCommand::SeekBackward(seek_step)),
            other => {
                self.handle_channel_message(other).await;
                None
            }
        };

        if let Some(command) = command {
            self.player.handle_command(command).await;
            println!("{}", describe_player(self.player.state()));
        }
    }

    async fn handle_channel_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Channels => {
                for channel in stream::channels() {
                    println!(
                        "{:<14} {:<16} {:<5} {:>5} listeners  {}",
                        channel.id,
                        channel.name,
                        if channel.is_live { "LIVE" } else { "off" },
                        channel.current_listeners,
                        channel.description
                    );
                }
            }
            AppMessage::Connect(id) => match stream::find_channel(&id) {
                Some(channel) => {
                    self.session.connect(channel);
                    self.print_feed();
                }
                None => println!("no channel '{id}'"),
            },
            AppMessage::StartStream => {
                self.session.start().await;
                println!("{}", self.describe_session());
            }
            AppMessage::StopStream => {
                self.session.stop();
                println!("{}", self.describe_session());
            }
            AppMessage::StreamVolume(volume) => {
                self.session.set_volume(volume);
                println!("{}", self.describe_session());
            }
            AppMessage::ToggleStreamMute => {
                self.session.toggle_mute();
                println!("{}", self.describe_session());
            }
            AppMessage::Disconnect => {
                self.session.disconnect();
                println!("{}", self.describe_session());
            }
            AppMessage::Chat => self.print_feed(),
            AppMessage::Say(text) => {
                if !self.session.is_connected() {
                    println!("connect to a channel first");
                } else if let Some(message) = self.chat.submit(&text, &mut self.session) {
                    info!(system = message.is_system, "chat_submitted");
                    self.print_feed();
                }
            }
            AppMessage::Rename(name) => match self.chat.set_username(&name) {
                Some(notice) => {
                    if self.session.is_connected() {
                        self.session.push_system_message(&notice);
                    }
                    println!("{notice}");
                }
                None => println!("usernames may only contain letters, digits and _"),
            },
            AppMessage::Invalid(reason) => println!("{reason}"),
            _ => {}
        }
    }

    fn print_playlist(&self) {
        let state = self.player.state();
        let current = state.current_index();
        for (i, song) in state.playlist.iter().enumerate() {
            let marker = if Some(i) == current { ">" } else { " " };
            println!(
                "{marker} {:>2}. {} - {} ({})",
                i + 1,
                song.artist,
                song.title,
                format_clock(song.length())
            );
        }
    }

    fn print_feed(&self) {
        for message in self.session.messages() {
            let time = message.timestamp.format("%H:%M");
            if message.is_system {
                println!("{time} * {}", message.message);
            } else if let Some(action) = message.message.strip_prefix("/me ") {
                println!("{time} * {} {action}", message.username);
            } else {
                println!("{time} <{}> {}", message.username, message.message);
            }
        }
    }

    fn describe_session(&self) -> String {
        let state = self.session.snapshot();
        let channel = state
            .current_channel
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        format!(
            "channel {channel} [{:?}] vol {}{} feed {}",
            state.phase(),
            state.volume,
            if state.is_muted { " (muted)" } else { "" },
            state.chat_messages.len()
        )
    }

    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
        self.session.disconnect();
        self.player.shutdown();
        info!("app_shutdown");
    }
}

pub fn describe_player(state: &PlaybackState) -> String {
    let song = state
        .current_song
        .as_ref()
        .map(|s| format!("{} - {}", s.artist, s.title))
        .unwrap_or_else(|| "nothing selected".to_string());
    format!(
        "{} {song} [{}/{}] vol {:.0}%{}{}{}",
        if state.is_playing { "▶" } else { "⏸" },
        format_clock(state.current_time),
        format_clock(state.duration),
        state.volume * 100.0,
        if state.is_muted { " muted" } else { "" },
        if state.repeat { " repeat" } else { "" },
        if state.shuffle { " shuffle" } else { "" },
    )
}

pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::playlist::default_playlist;
    use crate::stream::SessionPhase;

    fn app() -> App {
        let config = AppConfig {
            chatter_delay_ms: 3_600_000..3_600_001,
            ..AppConfig::default()
        };
        App::with_store(config, Arc::new(MemoryPreferenceStore::new()))
    }

    async fn type_line(app: &mut App, line: &str) {
        app.handle_event(Event::Input(line.to_string())).await;
    }

    #[tokio::test]
    async fn playlist_event_loads_songs() {
        let mut app = app();
        app.handle_event(Event::PlaylistLoaded(default_playlist())).await;
        assert_eq!(app.player.state().playlist.len(), 5);
        assert_eq!(app.player.state().current_song.as_ref().map(|s| s.id), Some(1));

        type_line(&mut app, "select 3").await;
        assert_eq!(app.player.state().current_song.as_ref().map(|s| s.id), Some(3));
        assert!(app.player.state().is_playing);

        type_line(&mut app, "vol -").await;
        assert!((app.player.state().volume - 0.65).abs() < 1e-6);
    }

    #[tokio::test]
    async fn channel_commands_drive_the_session() {
        let mut app = app();
        type_line(&mut app, "connect NEON-BEATS").await;
        assert_eq!(app.session.phase(), SessionPhase::Connected);

        type_line(&mut app, "start").await;
        assert_eq!(app.session.phase(), SessionPhase::Streaming);

        type_line(&mut app, "say hello").await;
        let last = app.session.messages().pop().expect("message");
        assert_eq!(last.message, "hello");
        assert_eq!(last.username, "CYBER_USER");

        type_line(&mut app, "dc").await;
        assert_eq!(app.session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn rename_announces_in_the_channel() {
        let mut app = app();
        type_line(&mut app, "connect cyber-radio-1").await;
        type_line(&mut app, "name trinity").await;

        assert_eq!(app.chat.username(), "TRINITY");
        let last = app.session.messages().pop().expect("notice");
        assert!(last.is_system);
        assert_eq!(last.message, "Username changed to: TRINITY");
    }

    #[tokio::test]
    async fn quit_and_closed_input_stop_the_loop() {
        let mut quitting = app();
        type_line(&mut quitting, "quit").await;
        assert!(quitting.should_quit);

        let mut closed = app();
        closed.handle_event(Event::InputClosed).await;
        assert!(closed.should_quit);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(Duration::from_secs(0)), "0:00");
        assert_eq!(format_clock(Duration::from_secs(372)), "6:12");
    }
}
