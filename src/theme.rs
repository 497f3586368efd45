use clap::ValueEnum;

/// Colour themes for charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    #[default]
    Default,
    DarkMode,
    SpotifyGreen,
    NeonPurple,
}

impl Theme {
    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::DarkMode => "Dark Mode",
            Theme::SpotifyGreen => "Spotify Green",
            Theme::NeonPurple => "Neon Purple",
        }
    }

    /// Hex colour palette, `None` for the terminal's own colours.
    pub fn palette(&self) -> Option<[&'static str; 3]> {
        match self {
            Theme::Default => None,
            Theme::DarkMode => Some(["#2E2E2E", "#404040", "#606060"]),
            Theme::SpotifyGreen => Some(["#1DB954", "#191414", "#1ed760"]),
            Theme::NeonPurple => Some(["#8A2BE2", "#9932CC", "#BA55D3"]),
        }
    }

    pub fn primary(&self) -> Option<&'static str> {
        match self {
            Theme::Default => None,
            Theme::DarkMode => Some("#404040"),
            Theme::SpotifyGreen => Some("#1DB954"),
            Theme::NeonPurple => Some("#8A2BE2"),
        }
    }

    /// Primary colour as RGB.
    pub fn primary_rgb(&self) -> Option<(u8, u8, u8)> {
        self.primary().and_then(parse_hex_color)
    }

    /// Last palette entry as RGB, used for chart values.
    pub fn accent_rgb(&self) -> Option<(u8, u8, u8)> {
        self.palette().and_then(|p| parse_hex_color(p[2]))
    }
}

/// Parses `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes() {
        assert_eq!(Theme::Default.palette(), None);
        assert_eq!(Theme::SpotifyGreen.primary(), Some("#1DB954"));
        assert_eq!(Theme::DarkMode.primary(), Some("#404040"));
        assert_eq!(
            Theme::NeonPurple.palette(),
            Some(["#8A2BE2", "#9932CC", "#BA55D3"])
        );
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1DB954"), Some((0x1D, 0xB9, 0x54)));
        assert_eq!(parse_hex_color("1ed760"), Some((0x1E, 0xD7, 0x60)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn test_primary_rgb() {
        assert_eq!(Theme::Default.primary_rgb(), None);
        assert_eq!(Theme::NeonPurple.primary_rgb(), Some((0x8A, 0x2B, 0xE2)));
    }

    #[test]
    fn test_accent_rgb() {
        assert_eq!(Theme::Default.accent_rgb(), None);
        assert_eq!(Theme::SpotifyGreen.accent_rgb(), Some((0x1E, 0xD7, 0x60)));
        assert_eq!(Theme::DarkMode.accent_rgb(), Some((0x60, 0x60, 0x60)));
    }
}
