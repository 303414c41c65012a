use deck_mpris::ToggleIcon;

/// Glyphs for the transport row.
#[derive(Clone)]
pub struct Icons {
    pub previous: &'static str,
    pub play: &'static str,
    pub pause: &'static str,
    pub next: &'static str,
}

impl Icons {
    pub fn new() -> Self {
        Self {
            previous: "⏮",
            play: "▶",
            pause: "⏸",
            next: "⏭",
        }
    }

    pub fn toggle(&self, icon: ToggleIcon) -> &'static str {
        match icon {
            ToggleIcon::Play => self.play,
            ToggleIcon::Pause => self.pause,
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::new()
    }
}
