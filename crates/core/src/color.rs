//! Color normalization.
//!
//! Theme sources are untrusted JSON, so every color notation we accept is
//! reduced to a canonical 24-bit RGB value and anything else resolves to a
//! caller-supplied fallback. [`normalize`] never fails.

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Regex matching `rgb(r, g, b)` / `rgba(r, g, b, a)` with up to 3-digit channels.
static RGB_FUNCTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})").unwrap()
});

/// A canonical 24-bit RGB color.
///
/// Displays as 6 upper-case hex digits without a `#` prefix (`2E75B6`),
/// which is also the form PPTX `srgbClr` values take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const ACCENT_BLUE: Color = Color::rgb(0x2E, 0x75, 0xB6);
    pub const DARK_GRAY: Color = Color::rgb(0x33, 0x33, 0x33);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse exactly six hex digits (no prefix).
    fn from_hex6(s: &str) -> Option<Self> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Canonical `RRGGBB` string.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalize a color notation, returning `fallback` for anything unrecognized.
///
/// Accepted notations:
/// - `2e75b6`, `#2E75B6` (surrounding whitespace ignored)
/// - `rgb(46, 117, 182)`, `rgba(46,117,182,0.5)`: channels clamped to `0..=255`
pub fn normalize(input: Option<&str>, fallback: Color) -> Color {
    let Some(raw) = input else {
        return fallback;
    };

    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if let Some(color) = Color::from_hex6(hex) {
        return color;
    }

    if let Some(caps) = RGB_FUNCTION_REGEX.captures(raw) {
        // At most 3 digits, so parsing as u16 cannot overflow.
        let channel = |i: usize| {
            caps[i]
                .parse::<u16>()
                .map(|n| n.min(255) as u8)
                .unwrap_or(0)
        };
        return Color::rgb(channel(1), channel(2), channel(3));
    }

    fallback
}

/// Normalize an arbitrary JSON value; non-strings resolve to `fallback`.
pub fn normalize_value(value: Option<&Value>, fallback: Color) -> Color {
    normalize(value.and_then(Value::as_str), fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const FALLBACK: Color = Color::rgb(1, 2, 3);

    #[test]
    fn test_hex_notations() {
        assert_eq!(normalize(Some("#2e75b6"), FALLBACK).to_hex(), "2E75B6");
        assert_eq!(normalize(Some("2E75B6"), FALLBACK).to_hex(), "2E75B6");
        assert_eq!(normalize(Some("  #ffffff "), FALLBACK), Color::WHITE);
    }

    #[test]
    fn test_rgb_notations() {
        assert_eq!(normalize(Some("rgb(46,117,182)"), FALLBACK).to_hex(), "2E75B6");
        assert_eq!(
            normalize(Some("RGBA( 46 , 117 , 182 , 0.4)"), FALLBACK).to_hex(),
            "2E75B6"
        );
        assert_eq!(normalize(Some("rgb(0,0,0)"), FALLBACK).to_hex(), "000000");
    }

    #[test]
    fn test_rgb_channels_are_clamped() {
        assert_eq!(normalize(Some("rgb(300,999,256)"), FALLBACK), Color::WHITE);
    }

    #[test]
    fn test_unrecognized_returns_fallback() {
        assert_eq!(normalize(None, FALLBACK), FALLBACK);
        assert_eq!(normalize(Some("notacolor"), FALLBACK), FALLBACK);
        assert_eq!(normalize(Some("#fff"), FALLBACK), FALLBACK);
        assert_eq!(normalize(Some("#2e75b6ff"), FALLBACK), FALLBACK);
        assert_eq!(normalize(Some("rgb(1,2)"), FALLBACK), FALLBACK);
        assert_eq!(normalize(Some(""), FALLBACK), FALLBACK);
    }

    #[test]
    fn test_non_string_values_return_fallback() {
        assert_eq!(normalize_value(Some(&json!({ "r": 1 })), FALLBACK), FALLBACK);
        assert_eq!(normalize_value(Some(&json!(42)), FALLBACK), FALLBACK);
        assert_eq!(normalize_value(Some(&Value::Null), FALLBACK), FALLBACK);
        assert_eq!(normalize_value(None, FALLBACK), FALLBACK);
        assert_eq!(
            normalize_value(Some(&json!("#333333")), FALLBACK),
            Color::DARK_GRAY
        );
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let value = serde_json::to_value(Color::ACCENT_BLUE).unwrap();
        assert_eq!(value, json!("2E75B6"));
    }

    proptest! {
        #[test]
        fn prop_rgb_round_trips_to_hex(r: u8, g: u8, b: u8) {
            let expected = format!("{:02X}{:02X}{:02X}", r, g, b);
            let from_rgb = normalize(Some(&format!("rgb({},{},{})", r, g, b)), FALLBACK);
            let from_hex = normalize(Some(&format!("#{}", expected.to_lowercase())), FALLBACK);
            prop_assert_eq!(from_rgb.to_hex(), expected.clone());
            prop_assert_eq!(from_hex.to_hex(), expected);
        }

        #[test]
        fn prop_normalize_is_total(input in ".*") {
            let hex = normalize(Some(&input), FALLBACK).to_hex();
            prop_assert_eq!(hex.len(), 6);
            prop_assert!(hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_lowercase()));
        }
    }
}
