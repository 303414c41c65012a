//! The media deck panel: presentation loop, view and intents.
//!
//! Runs on a current-thread runtime. A repeating tick drains the session's
//! update queue into the view; user intents are dispatched as they arrive.
//! Remote calls never run here, they are handed to the session's
//! background runtime.

pub mod events;
pub mod media;

use deck_mpris::{MediaSession, PlayerProxy};
use events::UserIntent;
use log::{debug, info, warn};
use media::DeckView;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::MissedTickBehavior;

pub async fn run<P, W>(
    session: &mut MediaSession<P>,
    view: &mut DeckView<W>,
    intents: &mut UnboundedReceiver<UserIntent>,
    poll_interval: Duration,
) where
    P: PlayerProxy,
    W: Write,
{
    session.render_all(view);

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut player_lost = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for patch in session.drain_updates() {
                    debug!("Applying update: {:?}", patch);
                    session.apply(&patch, view);
                }
                if !player_lost && !session.subscription().is_active() {
                    warn!("Player subscription ended, the deck no longer follows the player");
                    player_lost = true;
                }
            }

            intent = intents.recv() => match intent {
                Some(UserIntent::Previous) => {
                    let _ = session.previous();
                }
                Some(UserIntent::Next) => {
                    let _ = session.next();
                }
                Some(UserIntent::TogglePlayback) => {
                    let _ = session.toggle_playback();
                }
                Some(UserIntent::Quit) | None => {
                    info!("Leaving media deck");
                    break;
                }
            }
        }
    }
}
