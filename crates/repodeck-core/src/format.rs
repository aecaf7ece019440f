// Display helpers shared by every screen
use chrono::{DateTime, Utc};

const FALLBACK_LANGUAGE_COLOR: &str = "#8e44ad";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#2b7489"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#F18E33"),
    ("Ruby", "#701516"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("PHP", "#4F5D95"),
    ("C#", "#178600"),
    ("Shell", "#89e051"),
    ("Dart", "#00B4AB"),
    ("Elixir", "#6e4a7e"),
];

/// Compact counts: 999, 1.2K, 3.4M
pub fn format_count(count: u32) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Short calendar date, e.g. "Jan 5, 2024"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Hex color for a language badge
pub fn language_color(language: Option<&str>) -> &'static str {
    language
        .and_then(|lang| {
            LANGUAGE_COLORS
                .iter()
                .find(|(name, _)| *name == lang)
                .map(|(_, color)| *color)
        })
        .unwrap_or(FALLBACK_LANGUAGE_COLOR)
}

/// Parse "#rrggbb" into its components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1.0K");
        assert_eq!(format_count(1_240), "1.2K");
        assert_eq!(format_count(45_600), "45.6K");
        assert_eq!(format_count(1_000_000), "1.0M");
        assert_eq!(format_count(3_400_000), "3.4M");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date), "Jan 5, 2024");

        let date = Utc.with_ymd_and_hms(2019, 11, 23, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date), "Nov 23, 2019");
    }

    #[test]
    fn test_language_color() {
        assert_eq!(language_color(Some("Rust")), "#dea584");
        assert_eq!(language_color(Some("C#")), "#178600");
        assert_eq!(language_color(Some("Brainfuck")), "#8e44ad");
        assert_eq!(language_color(None), "#8e44ad");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#dea584"), Some((0xde, 0xa5, 0x84)));
        assert_eq!(parse_hex_color("#F18E33"), Some((0xf1, 0x8e, 0x33)));
        assert_eq!(parse_hex_color("dea584"), None);
        assert_eq!(parse_hex_color("#abc"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }
}
