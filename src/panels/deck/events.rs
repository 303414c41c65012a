//! Deck user intents and the input reader feeding them.
//!
//! The reader blocks on stdin on its own thread and forwards parsed
//! intents over a tokio channel; the presentation loop is the only consumer.

use log::{debug, info, warn};
use std::io::{self, BufRead};
use std::thread;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// What the user asked for, one per button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserIntent {
    Previous,
    TogglePlayback,
    Next,
    Quit,
}

impl UserIntent {
    /// Parse one input line. Empty input toggles playback.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "t" | "toggle" | "space" => Some(UserIntent::TogglePlayback),
            "p" | "prev" | "previous" => Some(UserIntent::Previous),
            "n" | "next" => Some(UserIntent::Next),
            "q" | "quit" | "exit" => Some(UserIntent::Quit),
            _ => None,
        }
    }
}

pub fn channel() -> (UnboundedSender<UserIntent>, UnboundedReceiver<UserIntent>) {
    mpsc::unbounded_channel()
}

/// Start the stdin reader. EOF drops the sender, which ends the
/// presentation loop.
pub fn start_input_reader(tx: UnboundedSender<UserIntent>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("deck-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                };

                match UserIntent::parse(&line) {
                    Some(intent) => {
                        debug!("Input intent: {:?}", intent);
                        let quit = intent == UserIntent::Quit;
                        if tx.send(intent).is_err() || quit {
                            break;
                        }
                    }
                    None => warn!(
                        "Unknown input '{}' (p=previous, t=toggle, n=next, q=quit)",
                        line.trim()
                    ),
                }
            }
            info!("Input reader stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intents() {
        assert_eq!(UserIntent::parse(""), Some(UserIntent::TogglePlayback));
        assert_eq!(UserIntent::parse("  t "), Some(UserIntent::TogglePlayback));
        assert_eq!(UserIntent::parse("P"), Some(UserIntent::Previous));
        assert_eq!(UserIntent::parse("previous"), Some(UserIntent::Previous));
        assert_eq!(UserIntent::parse("next"), Some(UserIntent::Next));
        assert_eq!(UserIntent::parse("q"), Some(UserIntent::Quit));
        assert_eq!(UserIntent::parse("volume up"), None);
    }
}
