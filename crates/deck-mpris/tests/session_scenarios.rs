//! End-to-end controller scenarios against a scripted player.

use deck_mpris::client::select_player;
use deck_mpris::proxy::{METADATA, PLAYBACK_STATUS};
use deck_mpris::{
    ArtworkLocation, CommandError, ConnectionError, DisplayState, MediaSession, NotificationStream,
    PlaybackStatus, PlayerNotification, PlayerProxy, QueryError, Renderer, SessionOptions,
    StatePatch, TrackMetadata, Variant,
};
use futures_util::StreamExt;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

struct ScriptedPlayer {
    status: PlaybackStatus,
    metadata: TrackMetadata,
    commands_fail: bool,
    notifications: Mutex<Option<mpsc::UnboundedReceiver<PlayerNotification>>>,
}

impl PlayerProxy for ScriptedPlayer {
    async fn playback_status(&self) -> Result<PlaybackStatus, QueryError> {
        Ok(self.status)
    }

    async fn metadata(&self) -> Result<TrackMetadata, QueryError> {
        Ok(self.metadata.clone())
    }

    async fn previous(&self) -> Result<(), CommandError> {
        if self.commands_fail {
            return Err(CommandError::DBus(zbus::Error::Failure(
                "Previous rejected".into(),
            )));
        }
        Ok(())
    }

    async fn next(&self) -> Result<(), CommandError> {
        Ok(())
    }

    async fn play_pause(&self) -> Result<(), CommandError> {
        Ok(())
    }

    async fn subscribe(&self) -> Result<NotificationStream, ConnectionError> {
        let rx = self
            .notifications
            .lock()
            .unwrap()
            .take()
            .expect("single subscription");
        Ok(
            futures_util::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|n| (n, rx))
            })
            .boxed(),
        )
    }
}

#[derive(Default)]
struct Screen {
    icon: Option<PlaybackStatus>,
    heading: Option<(String, String)>,
    artwork: Option<String>,
    refreshes: usize,
}

impl Renderer for Screen {
    fn playback_icon_changed(&mut self, status: PlaybackStatus) {
        self.icon = Some(status);
        self.refreshes += 1;
    }

    fn artist_title_changed(&mut self, artist: &str, title: &str) {
        self.heading = Some((artist.to_string(), title.to_string()));
        self.refreshes += 1;
    }

    fn artwork_changed(&mut self, location: &ArtworkLocation) {
        self.artwork = Some(location.to_string());
        self.refreshes += 1;
    }
}

async fn scenario_a(
    commands_fail: bool,
) -> (
    MediaSession<ScriptedPlayer>,
    mpsc::UnboundedSender<PlayerNotification>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let player = ScriptedPlayer {
        status: PlaybackStatus::Paused,
        metadata: TrackMetadata {
            artist: vec!["A".into(), "B".into()],
            title: "T".into(),
            art_url: "file:///a.png".into(),
        },
        commands_fail,
        notifications: Mutex::new(Some(rx)),
    };
    let options = SessionOptions {
        status_refresh_delay: Duration::ZERO,
    };
    let session = MediaSession::start(player, Handle::current(), options)
        .await
        .unwrap();
    (session, tx)
}

#[tokio::test]
async fn construction_from_snapshot() {
    let (session, _feed) = scenario_a(false).await;
    let state = session.state();

    assert_eq!(state.playback_status, PlaybackStatus::Paused);
    assert_eq!(state.artist_line(), "A,B");
    assert_eq!(state.title, "T");
    assert_eq!(state.artwork.as_ref().map(|a| a.as_str()), Some("/a.png"));
}

#[tokio::test]
async fn status_notification_after_construction() {
    let (mut session, feed) = scenario_a(false).await;
    let before = session.state().clone();

    feed.send(PlayerNotification::new().with(PLAYBACK_STATUS, Variant::from("Playing")))
        .unwrap();

    let mut screen = Screen::default();
    let patch = session.next_update().await.unwrap();
    session.apply(&patch, &mut screen);

    let expected = DisplayState {
        playback_status: PlaybackStatus::Playing,
        ..before
    };
    assert_eq!(session.state(), &expected);
    assert_eq!(screen.icon, Some(PlaybackStatus::Playing));
    assert_eq!(screen.heading, None);
    assert_eq!(screen.artwork, None);
}

#[test]
fn connect_with_no_players_fails() {
    let names = ["org.freedesktop.DBus", ":1.7"];
    assert!(matches!(
        select_player(names),
        Err(ConnectionError::NoPlayerFound)
    ));
}

#[tokio::test]
async fn failed_previous_leaves_state_identical() {
    let (mut session, _feed) = scenario_a(true).await;
    let before = session.state().clone();

    session.previous().await.unwrap();

    assert!(session.drain_updates().is_empty());
    assert_eq!(session.state(), &before);
}

#[tokio::test]
async fn absent_fields_survive_any_notification_sequence() {
    let (mut session, feed) = scenario_a(false).await;

    let title_only = |t: &str| {
        Variant::Map(BTreeMap::from([(
            "xesam:title".to_string(),
            Variant::from(t),
        )]))
    };
    let art_only = |u: &str| {
        Variant::Map(BTreeMap::from([(
            "mpris:artUrl".to_string(),
            Variant::from(u),
        )]))
    };

    let events = vec![
        PlayerNotification::new().with(METADATA, title_only("One")),
        PlayerNotification::new().with(PLAYBACK_STATUS, Variant::from("Stopped")),
        PlayerNotification::new().with(METADATA, art_only("https://x/y.png")),
        PlayerNotification::new().with(PLAYBACK_STATUS, Variant::from("Playing")),
        PlayerNotification::new().with(METADATA, title_only("Two")),
    ];
    let count = events.len();
    for event in events {
        feed.send(event).unwrap();
    }

    let mut screen = Screen::default();
    let mut previous = session.state().clone();
    for _ in 0..count {
        let patch: StatePatch = session.next_update().await.unwrap();
        session.apply(&patch, &mut screen);
        let current = session.state().clone();

        if patch.playback_status.is_none() {
            assert_eq!(current.playback_status, previous.playback_status);
        }
        if patch.artist.is_none() {
            assert_eq!(current.artist, previous.artist);
        }
        if patch.title.is_none() {
            assert_eq!(current.title, previous.title);
        }
        if patch.artwork.is_none() {
            assert_eq!(current.artwork, previous.artwork);
        }
        previous = current;
    }

    let state = session.state();
    assert_eq!(state.playback_status, PlaybackStatus::Playing);
    assert_eq!(state.artist_line(), "A,B");
    assert_eq!(state.title, "Two");
    assert_eq!(state.artwork.as_ref().map(|a| a.as_str()), Some("https://x/y.png"));
    assert_eq!(screen.refreshes, count);
}
