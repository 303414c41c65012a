//! Media deck view
//! Terminal stand-in for the widget tree: a transport row, the
//! artist/title heading and the artwork reference. Each render callback
//! updates one widget and redraws the frame.

use crate::functions::formatting::{artist_title_heading, artwork_line};
use crate::icons::Icons;
use deck_mpris::{ArtworkLocation, PlaybackStatus, Renderer, ToggleIcon};
use log::{debug, warn};
use std::io::Write;

pub struct DeckView<W: Write> {
    icons: Icons,
    toggle: ToggleIcon,
    heading: String,
    artwork: Option<String>,
    frames: usize,
    out: W,
}

impl<W: Write> DeckView<W> {
    pub fn new(out: W) -> Self {
        Self {
            icons: Icons::new(),
            toggle: ToggleIcon::Play,
            heading: String::new(),
            artwork: None,
            frames: 0,
            out,
        }
    }

    pub fn transport_row(&self) -> String {
        format!(
            "{}  {}  {}",
            self.icons.previous,
            self.icons.toggle(self.toggle),
            self.icons.next
        )
    }

    #[cfg(test)]
    pub fn heading(&self) -> &str {
        &self.heading
    }

    #[cfg(test)]
    pub fn frames(&self) -> usize {
        self.frames
    }

    fn refresh(&mut self) {
        self.frames += 1;
        let artwork = artwork_line(self.artwork.as_deref().unwrap_or_default());
        let frame = format!("{}\n{}\n{}\n", self.heading, artwork, self.transport_row());

        if let Err(e) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|_| self.out.flush())
        {
            warn!("Failed to draw deck: {}", e);
        }
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Renderer for DeckView<W> {
    fn playback_icon_changed(&mut self, status: PlaybackStatus) {
        debug!("Playback icon -> {:?}", status);
        self.toggle = status.toggle_icon();
        self.refresh();
    }

    fn artist_title_changed(&mut self, artist: &str, title: &str) {
        self.heading = artist_title_heading(artist, title);
        self.refresh();
    }

    fn artwork_changed(&mut self, location: &ArtworkLocation) {
        debug!("Artwork -> {}", location);
        self.artwork = Some(location.to_string());
        self.refresh();
    }
}
