//! Media session controller
//!
//! Two executors meet here:
//! - A background runtime runs the notification listener and every remote
//!   call. It never touches [`DisplayState`].
//! - The presentation loop owns the [`MediaSession`]. It drains
//!   [`StatePatch`]es from the handoff channel and applies them, firing the
//!   render callbacks on its own thread.

use crate::error::SessionError;
use crate::normalize::normalize;
use crate::proxy::{NotificationStream, PlayerProxy};
use crate::types::{ArtworkLocation, DisplayState, PlaybackStatus, PlayerCommand, StatePatch};
use futures_util::StreamExt;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delay before re-polling the status after PlayPause.
pub const DEFAULT_STATUS_REFRESH_DELAY: Duration = Duration::from_millis(100);

/// Render callbacks. Called only from the thread that owns the session.
pub trait Renderer {
    fn playback_icon_changed(&mut self, status: PlaybackStatus);
    fn artist_title_changed(&mut self, artist: &str, title: &str);
    fn artwork_changed(&mut self, location: &ArtworkLocation);
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub status_refresh_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            status_refresh_delay: DEFAULT_STATUS_REFRESH_DELAY,
        }
    }
}

/// The single outstanding registration with the player. The listener task
/// is aborted when this is dropped.
pub struct Subscription {
    listener: JoinHandle<()>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        !self.listener.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Counts status-bearing notifications queued by the listener. Both the
/// listener and the toggle refresh send status patches while holding the
/// lock, so a refresh can tell whether a notification overtook its query.
#[derive(Default)]
struct StatusSequence(Mutex<u64>);

impl StatusSequence {
    fn lock(&self) -> MutexGuard<'_, u64> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current(&self) -> u64 {
        *self.lock()
    }

    fn send_notification(
        &self,
        updates_tx: &mpsc::UnboundedSender<StatePatch>,
        patch: StatePatch,
    ) -> Result<(), mpsc::error::SendError<StatePatch>> {
        let mut seq = self.lock();
        if patch.playback_status.is_some() {
            *seq += 1;
        }
        updates_tx.send(patch)
    }

    /// Queue a refreshed status unless a status notification was queued
    /// after `since`. Returns whether the refresh was queued.
    fn send_refresh(
        &self,
        updates_tx: &mpsc::UnboundedSender<StatePatch>,
        since: u64,
        status: PlaybackStatus,
    ) -> bool {
        let seq = self.lock();
        if *seq != since {
            return false;
        }
        updates_tx.send(StatePatch::status(status)).is_ok()
    }
}

pub struct MediaSession<P: PlayerProxy> {
    proxy: Arc<P>,
    state: DisplayState,
    runtime: Handle,
    options: SessionOptions,
    updates_tx: mpsc::UnboundedSender<StatePatch>,
    updates_rx: mpsc::UnboundedReceiver<StatePatch>,
    status_seq: Arc<StatusSequence>,
    subscription: Subscription,
}

impl<P: PlayerProxy> MediaSession<P> {
    /// Query the initial state, subscribe, and start the listener on
    /// `runtime`. Any query failure aborts construction.
    pub async fn start(
        proxy: P,
        runtime: Handle,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let status = proxy.playback_status().await?;
        let metadata = proxy.metadata().await?;
        let state = DisplayState::initial(status, metadata);
        info!(
            "Initial state: status={:?}, artist='{}', title='{}'",
            state.playback_status,
            state.artist_line(),
            state.title
        );

        let stream = proxy.subscribe().await?;
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let status_seq = Arc::new(StatusSequence::default());
        let listener = runtime.spawn(run_listener(
            stream,
            updates_tx.clone(),
            Arc::clone(&status_seq),
        ));

        Ok(Self {
            proxy: Arc::new(proxy),
            state,
            runtime,
            options,
            updates_tx,
            updates_rx,
            status_seq,
            subscription: Subscription { listener },
        })
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Wait for the next queued update. Command tasks share the queue, so
    /// this keeps waiting after the listener stops; check
    /// [`Subscription::is_active`] to notice that.
    pub async fn next_update(&mut self) -> Option<StatePatch> {
        self.updates_rx.recv().await
    }

    /// Take every queued update in arrival order. Consecutive identical
    /// patches are collapsed; nothing else is dropped or merged.
    pub fn drain_updates(&mut self) -> Vec<StatePatch> {
        let mut updates: Vec<StatePatch> = Vec::new();
        while let Ok(patch) = self.updates_rx.try_recv() {
            if updates.last() == Some(&patch) {
                continue;
            }
            updates.push(patch);
        }
        updates
    }

    /// Replace the state with `patch` applied and fire the callbacks for
    /// the fields it carries.
    pub fn apply<R: Renderer>(&mut self, patch: &StatePatch, renderer: &mut R) {
        self.state = self.state.apply(patch);

        if patch.playback_status.is_some() {
            renderer.playback_icon_changed(self.state.playback_status);
        }
        if patch.touches_artist_or_title() {
            renderer.artist_title_changed(&self.state.artist_line(), &self.state.title);
        }
        if let Some(location) = &patch.artwork {
            renderer.artwork_changed(location);
        }
    }

    /// Push the whole current state to `renderer`.
    pub fn render_all<R: Renderer>(&self, renderer: &mut R) {
        renderer.playback_icon_changed(self.state.playback_status);
        renderer.artist_title_changed(&self.state.artist_line(), &self.state.title);
        if let Some(location) = &self.state.artwork {
            renderer.artwork_changed(location);
        }
    }

    pub fn previous(&self) -> JoinHandle<()> {
        self.dispatch(PlayerCommand::Previous)
    }

    pub fn next(&self) -> JoinHandle<()> {
        self.dispatch(PlayerCommand::Next)
    }

    /// PlayPause, then re-query the status. Only the query result reaches
    /// the state; a failed query leaves the icon as it was, and a status
    /// notification queued while the query was in flight wins over it.
    pub fn toggle_playback(&self) -> JoinHandle<()> {
        self.dispatch(PlayerCommand::TogglePlayback)
    }

    /// Run `command` on the background runtime. The returned handle may be
    /// dropped; the call still completes.
    pub fn dispatch(&self, command: PlayerCommand) -> JoinHandle<()> {
        let proxy = Arc::clone(&self.proxy);
        let updates_tx = self.updates_tx.clone();
        let refresh_delay = self.options.status_refresh_delay;
        let status_seq = Arc::clone(&self.status_seq);

        self.runtime.spawn(async move {
            debug!("Sending {} command", command);
            let result = match command {
                PlayerCommand::Previous => proxy.previous().await,
                PlayerCommand::Next => proxy.next().await,
                PlayerCommand::TogglePlayback => proxy.play_pause().await,
            };

            if let Err(e) = result {
                warn!("{} command failed: {}", command, e);
                return;
            }

            if command == PlayerCommand::TogglePlayback {
                if !refresh_delay.is_zero() {
                    tokio::time::sleep(refresh_delay).await;
                }
                let since = status_seq.current();
                match proxy.playback_status().await {
                    Ok(status) => {
                        if !status_seq.send_refresh(&updates_tx, since, status) {
                            debug!("Dropping status refresh, a newer notification arrived");
                        }
                    }
                    Err(e) => warn!("Failed to get playback status: {}", e),
                }
            }
        })
    }
}

/// Background listener: FIFO over the stream, one patch per event.
async fn run_listener(
    mut stream: NotificationStream,
    updates_tx: mpsc::UnboundedSender<StatePatch>,
    status_seq: Arc<StatusSequence>,
) {
    while let Some(notification) = stream.next().await {
        let patch = normalize(&notification);
        if patch.is_empty() {
            continue;
        }
        if status_seq.send_notification(&updates_tx, patch).is_err() {
            debug!("Session dropped, stopping listener");
            return;
        }
    }
    warn!("Player notification stream ended, no further updates will arrive");
}
