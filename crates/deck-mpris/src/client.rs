//! zbus-backed Player Proxy
//!
//! One session-bus connection bound to the first MPRIS player found:
//! - Properties are queried on demand
//! - PropertiesChanged signals are turned into [`PlayerNotification`]s
//! - Commands are plain method calls on the player interface

use crate::error::{CommandError, ConnectionError, QueryError};
use crate::normalize::decode_snapshot;
use crate::proxy::{NotificationStream, PlayerNotification, PlayerProxy};
use crate::types::{PlaybackStatus, TrackMetadata};
use crate::variant;
use futures_util::StreamExt;
use futures_util::future;
use log::{debug, info, warn};
use std::collections::HashMap;
use zbus::Connection;
use zbus::zvariant::OwnedValue;

const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";
const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";
const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";
const SIGNAL_QUEUE_CAPACITY: usize = 100;

/// D-Bus proxy for MPRIS player interface
#[zbus::proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait MprisPlayer {
    fn play_pause(&self) -> zbus::Result<()>;
    fn next(&self) -> zbus::Result<()>;
    fn previous(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    #[zbus(property)]
    fn playback_status(&self) -> zbus::Result<String>;
}

/// D-Bus proxy for MPRIS root interface
#[zbus::proxy(
    interface = "org.mpris.MediaPlayer2",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait MprisRoot {
    #[zbus(property)]
    fn identity(&self) -> zbus::Result<String>;
}

/// The one remote player this process controls.
pub struct DbusPlayer {
    connection: Connection,
    bus_name: String,
    player: MprisPlayerProxy<'static>,
}

impl DbusPlayer {
    /// Open the session bus and bind to the first MPRIS player listed.
    pub async fn connect() -> Result<Self, ConnectionError> {
        let connection = Connection::session()
            .await
            .map_err(ConnectionError::BusUnavailable)?;

        let dbus_proxy = zbus::fdo::DBusProxy::new(&connection).await?;
        let names = dbus_proxy.list_names().await?;
        let bus_name = select_player(names.iter().map(|n| n.as_str()))?;

        let player = MprisPlayerProxy::builder(&connection)
            .destination(bus_name.clone())?
            .build()
            .await?;

        let identity = match MprisRootProxy::builder(&connection)
            .destination(bus_name.as_str())?
            .build()
            .await
        {
            Ok(root) => root
                .identity()
                .await
                .unwrap_or_else(|_| short_name(&bus_name)),
            Err(_) => short_name(&bus_name),
        };
        info!("Bound to MPRIS player '{}' ({})", identity, bus_name);

        Ok(Self {
            connection,
            bus_name,
            player,
        })
    }

    pub fn bus_name(&self) -> &str {
        &self.bus_name
    }
}

impl PlayerProxy for DbusPlayer {
    async fn playback_status(&self) -> Result<PlaybackStatus, QueryError> {
        let status = self.player.playback_status().await?;
        debug!("PlaybackStatus query: '{}'", status);
        Ok(PlaybackStatus::from_remote(&status))
    }

    async fn metadata(&self) -> Result<TrackMetadata, QueryError> {
        let raw = self.player.metadata().await?;
        let metadata = decode_snapshot(&variant::map_from_owned(raw))?;
        debug!("Metadata query: {:?}", metadata);
        Ok(metadata)
    }

    async fn previous(&self) -> Result<(), CommandError> {
        self.player.previous().await?;
        Ok(())
    }

    async fn next(&self) -> Result<(), CommandError> {
        self.player.next().await?;
        Ok(())
    }

    async fn play_pause(&self) -> Result<(), CommandError> {
        self.player.play_pause().await?;
        Ok(())
    }

    async fn subscribe(&self) -> Result<NotificationStream, ConnectionError> {
        let rule = zbus::MatchRule::builder()
            .msg_type(zbus::message::Type::Signal)
            .interface("org.freedesktop.DBus.Properties")
            .and_then(|b| b.member("PropertiesChanged"))
            .and_then(|b| b.sender(self.bus_name.as_str()))
            .and_then(|b| b.path(MPRIS_PATH))
            .map_err(ConnectionError::Subscribe)?
            .build();

        let stream = zbus::MessageStream::for_match_rule(
            rule,
            &self.connection,
            Some(SIGNAL_QUEUE_CAPACITY),
        )
        .await
        .map_err(ConnectionError::Subscribe)?;

        info!("Listening for PropertiesChanged from {}", self.bus_name);

        Ok(stream
            .filter_map(|msg| {
                future::ready(match msg {
                    Ok(msg) => properties_changed(&msg),
                    Err(e) => {
                        warn!("Dropping unreadable D-Bus message: {}", e);
                        None
                    }
                })
            })
            .boxed())
    }
}

/// Turn a PropertiesChanged signal into a notification for the player
/// interface. Other interfaces and undecodable bodies yield `None`.
fn properties_changed(msg: &zbus::Message) -> Option<PlayerNotification> {
    // Body: (interface: s, changed_props: a{sv}, invalidated: as)
    match msg.body().deserialize::<PropertiesChangedBody>() {
        Ok((interface, changed, _)) => notification_from_body(&interface, changed),
        Err(e) => {
            warn!("Failed to parse PropertiesChanged body: {}", e);
            None
        }
    }
}

type PropertiesChangedBody = (String, HashMap<String, OwnedValue>, Vec<String>);

fn notification_from_body(
    interface: &str,
    changed: HashMap<String, OwnedValue>,
) -> Option<PlayerNotification> {
    if interface != PLAYER_INTERFACE {
        return None;
    }

    debug!(
        "PropertiesChanged: {:?}",
        changed.keys().collect::<Vec<_>>()
    );
    Some(PlayerNotification {
        changed: variant::map_from_owned(changed),
    })
}

/// Pick the player to bind to: the first MPRIS name in listing order.
pub fn select_player<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<String, ConnectionError> {
    names
        .into_iter()
        .find(|n| n.starts_with(MPRIS_PREFIX))
        .map(str::to_string)
        .ok_or(ConnectionError::NoPlayerFound)
}

/// "org.mpris.MediaPlayer2.spotify" -> "spotify"
/// "org.mpris.MediaPlayer2.firefox.instance_1_234" -> "firefox"
pub fn short_name(bus_name: &str) -> String {
    bus_name
        .strip_prefix(MPRIS_PREFIX)
        .unwrap_or(bus_name)
        .split('.')
        .next()
        .unwrap_or(bus_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_player_empty_listing() {
        let err = select_player(Vec::<&str>::new()).unwrap_err();
        assert!(matches!(err, ConnectionError::NoPlayerFound));
    }

    #[test]
    fn test_select_player_skips_non_mpris_names() {
        let names = [
            "org.freedesktop.DBus",
            ":1.42",
            "org.mpris.MediaPlayer2.vlc",
            "org.mpris.MediaPlayer2.spotify",
        ];
        assert_eq!(select_player(names).unwrap(), "org.mpris.MediaPlayer2.vlc");
    }

    #[test]
    fn test_select_player_without_mpris_names() {
        let names = ["org.freedesktop.DBus", "org.gnome.Shell"];
        assert!(matches!(
            select_player(names),
            Err(ConnectionError::NoPlayerFound)
        ));
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("org.mpris.MediaPlayer2.spotify"), "spotify");
        assert_eq!(
            short_name("org.mpris.MediaPlayer2.firefox.instance_1_234"),
            "firefox"
        );
        assert_eq!(short_name("custom"), "custom");
    }

    fn wire_body(interface: &str) -> PropertiesChangedBody {
        use zbus::zvariant::{LE, Value, serialized::Context, to_bytes};

        let metadata = Value::from(HashMap::from([
            ("xesam:artist", Value::from(vec!["A", "B"])),
            ("xesam:title", Value::from("T")),
            ("mpris:artUrl", Value::from("file:///a.png")),
        ]));
        let changed = HashMap::from([
            ("Metadata", metadata),
            ("PlaybackStatus", Value::from("Playing")),
        ]);
        let body = (interface, changed, Vec::<String>::new());

        let ctxt = Context::new_dbus(LE, 0);
        let data = to_bytes(ctxt, &body).unwrap();
        let (decoded, _) = data.deserialize::<PropertiesChangedBody>().unwrap();
        decoded
    }

    #[test]
    fn test_wire_body_normalizes_to_full_patch() {
        let (interface, changed, _) = wire_body(PLAYER_INTERFACE);
        let notification = notification_from_body(&interface, changed).unwrap();

        let patch = crate::normalize::normalize(&notification);
        assert_eq!(patch.playback_status, Some(PlaybackStatus::Playing));
        assert_eq!(patch.artist, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(patch.title.as_deref(), Some("T"));
        assert_eq!(patch.artwork.as_ref().map(|a| a.as_str()), Some("/a.png"));
    }

    #[test]
    fn test_other_interface_is_ignored() {
        let (interface, changed, _) = wire_body("org.mpris.MediaPlayer2");
        assert!(notification_from_body(&interface, changed).is_none());
    }
}
