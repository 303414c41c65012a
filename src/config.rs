//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/mediadeck/config.json` (or
//! `$HOME/.config/mediadeck/config.json`); `MEDIADECK_CONFIG` overrides the
//! path. A missing file means defaults.

use deck_mpris::SessionOptions;
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = "mediadeck";
const CONFIG_FILE: &str = "config.json";
const CONFIG_ENV: &str = "MEDIADECK_CONFIG";

const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
const DEFAULT_STATUS_REFRESH_DELAY_MS: u64 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// How often the presentation loop drains player updates.
    pub poll_interval_ms: u64,
    /// Wait after PlayPause before re-reading the playback status.
    pub status_refresh_delay_ms: u64,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            status_refresh_delay_ms: DEFAULT_STATUS_REFRESH_DELAY_MS,
        }
    }
}

impl DeckConfig {
    /// Resolve the config path from the environment.
    pub fn path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            format!("{}/.config", home)
        });
        PathBuf::from(base).join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load from `path`, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Failed to read {}: {}. Using defaults", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Invalid config {}: {}. Using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn poll_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            status_refresh_delay: Duration::from_millis(self.status_refresh_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mediadeck-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("mediadeck-definitely-missing.json");
        assert_eq!(DeckConfig::load(&path), DeckConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = scratch_file("partial.json", r#"{ "poll_interval_ms": 20 }"#);
        let config = DeckConfig::load(&path);
        assert_eq!(config.poll_interval_ms, 20);
        assert_eq!(config.status_refresh_delay_ms, DEFAULT_STATUS_REFRESH_DELAY_MS);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let path = scratch_file("invalid.json", "{ not json");
        assert_eq!(DeckConfig::load(&path), DeckConfig::default());
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = DeckConfig {
            poll_interval_ms: 0,
            ..DeckConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(
            config.session_options().status_refresh_delay,
            Duration::from_millis(DEFAULT_STATUS_REFRESH_DELAY_MS)
        );
    }
}
