//! Error types for deck-mpris

/// Failures while locating or binding the player. Fatal to startup.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("D-Bus session bus unavailable: {0}")]
    BusUnavailable(#[source] zbus::Error),

    #[error("No MPRIS player found")]
    NoPlayerFound,

    #[error("Failed to subscribe to player notifications: {0}")]
    Subscribe(#[source] zbus::Error),

    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),

    #[error("D-Bus fdo error: {0}")]
    Fdo(#[from] zbus::fdo::Error),
}

/// Failures of a state query against the player.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Malformed player reply: {0}")]
    Malformed(#[from] DecodeError),
}

/// Failures of a transport command. Always recoverable.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),
}

/// A payload value did not have the shape the key requires.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("'{key}': expected {expected}, found {found}")]
pub struct DecodeError {
    pub key: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl DecodeError {
    pub fn new(key: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self {
            key: key.into(),
            expected,
            found,
        }
    }
}

/// Reasons a media session could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Initial player state query failed: {0}")]
    Query(#[from] QueryError),
}
