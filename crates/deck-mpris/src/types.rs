//! Core types for deck-mpris

use std::fmt;

const FILE_SCHEME: &str = "file://";

/// Playback status as shown by the transport controls.
///
/// Only `"Playing"` maps to [`PlaybackStatus::Playing`]; `"Paused"`,
/// `"Stopped"` and anything unrecognised collapse to `Paused`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    #[default]
    Paused,
}

impl PlaybackStatus {
    pub fn from_remote(s: &str) -> Self {
        match s {
            "Playing" => PlaybackStatus::Playing,
            _ => PlaybackStatus::Paused,
        }
    }

    /// Icon the play/pause button shows for this status.
    pub fn toggle_icon(&self) -> ToggleIcon {
        match self {
            PlaybackStatus::Playing => ToggleIcon::Pause,
            PlaybackStatus::Paused => ToggleIcon::Play,
        }
    }
}

/// Icon on the play/pause button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleIcon {
    Play,
    Pause,
}

/// Commands that can be sent to the media player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Previous,
    TogglePlayback,
    Next,
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerCommand::Previous => "Previous",
            PlayerCommand::TogglePlayback => "PlayPause",
            PlayerCommand::Next => "Next",
        };
        f.write_str(name)
    }
}

/// Artwork reference handed to the renderer: a local path, or the original
/// URI when it did not use the `file://` scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtworkLocation(String);

impl ArtworkLocation {
    /// Strips exactly one leading `file://`. Every other input, including
    /// the empty string and other schemes, passes through unchanged.
    pub fn from_art_url(url: &str) -> Self {
        Self(url.strip_prefix(FILE_SCHEME).unwrap_or(url).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtworkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata snapshot returned by a synchronous query.
///
/// Keys missing from the player's reply are defaulted to empty values here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: Vec<String>,
    pub title: String,
    pub art_url: String,
}

/// A partial update. `None` means "unchanged".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub playback_status: Option<PlaybackStatus>,
    pub artist: Option<Vec<String>>,
    pub title: Option<String>,
    pub artwork: Option<ArtworkLocation>,
}

impl StatePatch {
    pub fn status(status: PlaybackStatus) -> Self {
        Self {
            playback_status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.playback_status.is_none()
            && self.artist.is_none()
            && self.title.is_none()
            && self.artwork.is_none()
    }

    pub fn touches_artist_or_title(&self) -> bool {
        self.artist.is_some() || self.title.is_some()
    }
}

/// What the UI should currently show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub playback_status: PlaybackStatus,
    pub artist: Vec<String>,
    pub title: String,
    pub artwork: Option<ArtworkLocation>,
}

impl DisplayState {
    /// Build the startup state from a status and metadata snapshot.
    /// An empty art url leaves the artwork absent.
    pub fn initial(status: PlaybackStatus, metadata: TrackMetadata) -> Self {
        let artwork = (!metadata.art_url.is_empty())
            .then(|| ArtworkLocation::from_art_url(&metadata.art_url));

        Self {
            playback_status: status,
            artist: metadata.artist,
            title: metadata.title,
            artwork,
        }
    }

    /// Returns the state with every field the patch carries replaced.
    pub fn apply(&self, patch: &StatePatch) -> Self {
        Self {
            playback_status: patch.playback_status.unwrap_or(self.playback_status),
            artist: patch.artist.clone().unwrap_or_else(|| self.artist.clone()),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            artwork: patch.artwork.clone().or_else(|| self.artwork.clone()),
        }
    }

    /// Artists joined for display.
    pub fn artist_line(&self) -> String {
        self.artist.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DisplayState {
        DisplayState::initial(
            PlaybackStatus::Paused,
            TrackMetadata {
                artist: vec!["A".into(), "B".into()],
                title: "T".into(),
                art_url: "file:///a.png".into(),
            },
        )
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(PlaybackStatus::from_remote("Playing"), PlaybackStatus::Playing);
        for other in ["Paused", "Stopped", "", "playing", "Buffering"] {
            assert_eq!(PlaybackStatus::from_remote(other), PlaybackStatus::Paused);
        }
    }

    #[test]
    fn test_toggle_icon_shows_opposite_action() {
        assert_eq!(PlaybackStatus::Playing.toggle_icon(), ToggleIcon::Pause);
        assert_eq!(PlaybackStatus::Paused.toggle_icon(), ToggleIcon::Play);
    }

    #[test]
    fn test_artwork_strips_single_file_prefix() {
        assert_eq!(ArtworkLocation::from_art_url("file:///tmp/art.png").as_str(), "/tmp/art.png");
        assert_eq!(
            ArtworkLocation::from_art_url("https://x/y.png").as_str(),
            "https://x/y.png"
        );
        assert_eq!(
            ArtworkLocation::from_art_url("file://file:///a.png").as_str(),
            "file:///a.png"
        );
        assert_eq!(ArtworkLocation::from_art_url("").as_str(), "");
        assert_eq!(ArtworkLocation::from_art_url("//host/a.png").as_str(), "//host/a.png");
    }

    #[test]
    fn test_initial_state() {
        let state = sample();
        assert_eq!(state.playback_status, PlaybackStatus::Paused);
        assert_eq!(state.artist_line(), "A,B");
        assert_eq!(state.title, "T");
        assert_eq!(state.artwork, Some(ArtworkLocation::from_art_url("/a.png")));
    }

    #[test]
    fn test_initial_state_without_art_url() {
        let state = DisplayState::initial(PlaybackStatus::Playing, TrackMetadata::default());
        assert_eq!(state.artwork, None);
        assert_eq!(state.artist_line(), "");
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let state = sample();
        let next = state.apply(&StatePatch::status(PlaybackStatus::Playing));
        assert_eq!(next.playback_status, PlaybackStatus::Playing);
        assert_eq!(next.artist, state.artist);
        assert_eq!(next.title, state.title);
        assert_eq!(next.artwork, state.artwork);

        let title_only = StatePatch {
            title: Some("U".into()),
            ..StatePatch::default()
        };
        let next = next.apply(&title_only);
        assert_eq!(next.title, "U");
        assert_eq!(next.artist_line(), "A,B");
        assert_eq!(next.playback_status, PlaybackStatus::Playing);
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let state = sample();
        assert!(StatePatch::default().is_empty());
        assert_eq!(state.apply(&StatePatch::default()), state);
    }
}
