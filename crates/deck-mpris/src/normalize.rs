//! Raw notification -> [`StatePatch`] normalization.

use crate::error::DecodeError;
use crate::proxy::{METADATA, PLAYBACK_STATUS, PlayerNotification};
use crate::types::{ArtworkLocation, PlaybackStatus, StatePatch, TrackMetadata};
use crate::variant::{Variant, expect_map, expect_str, expect_str_list, optional};
use log::{debug, warn};
use std::collections::BTreeMap;

pub const ARTIST_KEY: &str = "xesam:artist";
pub const TITLE_KEY: &str = "xesam:title";
pub const ART_URL_KEY: &str = "mpris:artUrl";

/// Metadata fields carried by one notification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    pub artist: Option<Vec<String>>,
    pub title: Option<String>,
    pub artwork: Option<ArtworkLocation>,
}

/// Normalize one notification into a partial update.
///
/// `PlaybackStatus` and `Metadata` decode independently: a malformed
/// metadata payload is logged and dropped without touching a valid status
/// in the same event.
pub fn normalize(notification: &PlayerNotification) -> StatePatch {
    let mut patch = StatePatch::default();

    if let Some(value) = notification.get(PLAYBACK_STATUS) {
        match decode_playback_status(value) {
            Ok(status) => patch.playback_status = Some(status),
            Err(e) => warn!("Dropping malformed PlaybackStatus: {}", e),
        }
    }

    if let Some(value) = notification.get(METADATA) {
        match decode_metadata(value) {
            Ok(metadata) => {
                patch.artist = metadata.artist;
                patch.title = metadata.title;
                patch.artwork = metadata.artwork;
            }
            Err(e) => warn!("Dropping malformed Metadata: {}", e),
        }
    }

    debug!("Normalized notification: {:?}", patch);
    patch
}

pub fn decode_playback_status(value: &Variant) -> Result<PlaybackStatus, DecodeError> {
    expect_str(PLAYBACK_STATUS, value).map(|s| PlaybackStatus::from_remote(&s))
}

/// Decode a `Metadata` change. Absent keys stay `None`; a present
/// `mpris:artUrl` always yields an artwork location.
pub fn decode_metadata(value: &Variant) -> Result<MetadataPatch, DecodeError> {
    let map = expect_map(METADATA, value)?;

    Ok(MetadataPatch {
        artist: optional(map, ARTIST_KEY, expect_str_list)?,
        title: optional(map, TITLE_KEY, expect_str)?,
        artwork: optional(map, ART_URL_KEY, expect_str)?
            .map(|url| ArtworkLocation::from_art_url(&url)),
    })
}

/// Decode a full metadata snapshot. Missing keys default to empty values;
/// present keys of the wrong type are an error.
pub fn decode_snapshot(map: &BTreeMap<String, Variant>) -> Result<TrackMetadata, DecodeError> {
    Ok(TrackMetadata {
        artist: optional(map, ARTIST_KEY, expect_str_list)?.unwrap_or_default(),
        title: optional(map, TITLE_KEY, expect_str)?.unwrap_or_default(),
        art_url: optional(map, ART_URL_KEY, expect_str)?.unwrap_or_default(),
    })
}
