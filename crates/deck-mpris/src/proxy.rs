//! Player Proxy contract consumed by the session controller.

use crate::error::{CommandError, ConnectionError, QueryError};
use crate::types::{PlaybackStatus, TrackMetadata};
use crate::variant::Variant;
use futures_util::stream::BoxStream;
use std::collections::BTreeMap;
use std::future::Future;

/// Property name carrying the playback status in a change notification.
pub const PLAYBACK_STATUS: &str = "PlaybackStatus";
/// Property name carrying the metadata dict in a change notification.
pub const METADATA: &str = "Metadata";

/// One raw change event: changed property name -> new value.
/// Properties absent from the map are unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerNotification {
    pub changed: BTreeMap<String, Variant>,
}

impl PlayerNotification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fakes.
    pub fn with(mut self, property: &str, value: Variant) -> Self {
        self.changed.insert(property.to_string(), value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&Variant> {
        self.changed.get(property)
    }
}

/// Unbounded, non-restartable sequence of change events.
pub type NotificationStream = BoxStream<'static, PlayerNotification>;

/// Imperative, query and subscription surface of the one bound player.
///
/// Command success only means the player accepted the call; the resulting
/// state change arrives later as a notification.
pub trait PlayerProxy: Send + Sync + 'static {
    fn playback_status(&self) -> impl Future<Output = Result<PlaybackStatus, QueryError>> + Send;

    fn metadata(&self) -> impl Future<Output = Result<TrackMetadata, QueryError>> + Send;

    fn previous(&self) -> impl Future<Output = Result<(), CommandError>> + Send;

    fn next(&self) -> impl Future<Output = Result<(), CommandError>> + Send;

    fn play_pause(&self) -> impl Future<Output = Result<(), CommandError>> + Send;

    fn subscribe(&self) -> impl Future<Output = Result<NotificationStream, ConnectionError>> + Send;
}
