//! mediadeck - transport controls for a running MPRIS player
//!
//! Two executors: a background runtime for the bus listener and remote
//! calls, and a current-thread presentation loop on the main thread.

mod config;
mod functions;
mod icons;
mod panels;
mod services;

use config::DeckConfig;
use log::{error, info};
use panels::deck::events;
use panels::deck::media::DeckView;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting mediadeck...");

    let config = DeckConfig::load(&DeckConfig::path());

    let background = match services::media::background_runtime() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create background runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = match services::media::start_session(&background, config.session_options()) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to start media session: {}", e);
            eprintln!("{}", services::media::diagnostic(&e));
            return ExitCode::from(services::media::exit_code(&e));
        }
    };

    let ui = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create presentation loop: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (intent_tx, mut intent_rx) = events::channel();
    if let Err(e) = events::start_input_reader(intent_tx) {
        error!("Failed to start input reader: {}", e);
        return ExitCode::FAILURE;
    }

    println!("Controls: p = previous, t/enter = play/pause, n = next, q = quit");
    let mut view = DeckView::new(io::stdout());
    ui.block_on(panels::deck::run(
        &mut session,
        &mut view,
        &mut intent_rx,
        config.poll_interval(),
    ));

    drop(session);
    background.shutdown_timeout(SHUTDOWN_GRACE);
    ExitCode::SUCCESS
}
