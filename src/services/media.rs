//! MPRIS session service.
//!
//! Owns the background runtime that runs the notification listener and
//! every remote call, and turns startup failures into user-facing
//! diagnostics.

use deck_mpris::{ConnectionError, DbusPlayer, MediaSession, SessionError, SessionOptions};
use log::info;
use std::io;
use tokio::runtime::{Builder, Handle, Runtime};

const BACKGROUND_THREADS: usize = 2;

/// Runtime for the listener and remote calls. Never drives the view.
pub fn background_runtime() -> io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(BACKGROUND_THREADS)
        .thread_name("mpris-worker")
        .enable_all()
        .build()
}

/// Bind to the player and construct the session on `runtime`.
pub fn start_session(
    runtime: &Runtime,
    options: SessionOptions,
) -> Result<MediaSession<DbusPlayer>, SessionError> {
    runtime.block_on(async {
        let player = DbusPlayer::connect().await?;
        info!("Starting media session for {}", player.bus_name());
        MediaSession::start(player, Handle::current(), options).await
    })
}

/// Exit status for a failed startup.
pub fn exit_code(error: &SessionError) -> u8 {
    match error {
        SessionError::Connection(ConnectionError::NoPlayerFound) => 2,
        SessionError::Connection(ConnectionError::BusUnavailable(_)) => 3,
        SessionError::Connection(_) => 4,
        SessionError::Query(_) => 5,
    }
}

/// One-line explanation for a failed startup.
pub fn diagnostic(error: &SessionError) -> String {
    match error {
        SessionError::Connection(ConnectionError::NoPlayerFound) => {
            "No media player is running. Start one that supports MPRIS and try again.".to_string()
        }
        SessionError::Connection(ConnectionError::BusUnavailable(e)) => {
            format!("Cannot reach the D-Bus session bus: {}", e)
        }
        SessionError::Connection(e) => format!("Failed to bind to the media player: {}", e),
        SessionError::Query(e) => format!("Could not read the player's current state: {}", e),
    }
}
