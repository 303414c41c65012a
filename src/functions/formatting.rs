/// Heading shown above the artwork: bold artist, then the title.
#[inline]
pub fn artist_title_heading(artist: &str, title: &str) -> String {
    format!("**{artist}**: {title}")
}

/// Artwork line; remote locations are shown as-is.
#[inline]
pub fn artwork_line(location: &str) -> String {
    if location.is_empty() {
        "[no artwork]".to_string()
    } else {
        format!("[artwork] {location}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        assert_eq!(artist_title_heading("A,B", "T"), "**A,B**: T");
        assert_eq!(artist_title_heading("", ""), "****: ");
    }

    #[test]
    fn test_artwork_line() {
        assert_eq!(artwork_line("/a.png"), "[artwork] /a.png");
        assert_eq!(artwork_line(""), "[no artwork]");
    }
}
