//! deck-mpris - MPRIS media session controller over zbus
//!
//! Features:
//! - Binds to exactly one running player on the session bus
//! - Partial-update normalization of PropertiesChanged payloads
//! - Listener/presentation split over a lossless FIFO channel

pub mod client;
pub mod error;
pub mod normalize;
pub mod proxy;
pub mod session;
pub mod types;
pub mod variant;

pub use client::DbusPlayer;
pub use error::{CommandError, ConnectionError, DecodeError, QueryError, SessionError};
pub use normalize::normalize;
pub use proxy::{NotificationStream, PlayerNotification, PlayerProxy};
pub use session::{MediaSession, Renderer, SessionOptions, Subscription};
pub use types::{
    ArtworkLocation, DisplayState, PlaybackStatus, PlayerCommand, StatePatch, ToggleIcon,
    TrackMetadata,
};
pub use variant::Variant;
