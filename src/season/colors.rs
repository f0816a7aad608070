//! Constructor display colors.

use super::identity::canonical_key;

/// Color used for any team not in the lookup table.
pub const DEFAULT_TEAM_COLOR: &str = "#888888";

const TEAM_COLORS: &[(&str, &str)] = &[
    ("Red Bull", "#3671C6"),
    ("Ferrari", "#E8002D"),
    ("Mercedes", "#00D2BE"),
    ("McLaren", "#FF8700"),
    ("Aston Martin", "#006F62"),
    ("Alpine F1 Team", "#0090FF"),
    ("Williams", "#005AFF"),
    ("RB F1 Team", "#6692FF"),
    ("Haas F1 Team", "#B6BABD"),
    ("Sauber", "#52E252"),
];

/// Hex color for a team name, falling back to [`DEFAULT_TEAM_COLOR`].
pub fn team_color(name: &str) -> &'static str {
    let key = canonical_key(name);
    TEAM_COLORS
        .iter()
        .find(|(team, _)| canonical_key(team) == key)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_TEAM_COLOR)
}

/// Team color as an RGB triple (for terminal truecolor output)
pub fn team_rgb(name: &str) -> (u8, u8, u8) {
    parse_hex(team_color(name)).unwrap_or((0x88, 0x88, 0x88))
}

/// Parse "#RRGGBB" into its components.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
