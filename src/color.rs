//! Colors for outlines and label tags.
//!
//! Accepts the spellings users type on a command line or put in a regions
//! file: CSS-style names (`"red"`, `"darkgreen"`), hex (`#rgb`, `#rrggbb`,
//! `#rrggbbaa`) and functional `rgb(r, g, b)` / `rgba(r, g, b, a)`.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub Rgba<u8>);

/// Error returned when a color string is not recognized.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unrecognized color '{input}': {reason}")]
pub struct ParseColorError {
    pub input: String,
    pub reason: String,
}

impl ParseColorError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color(Rgba([red, green, blue, 255]))
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Color(Rgba([red, green, blue, alpha]))
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        self.0
    }

    /// Looks up a named color, ignoring case, spaces and underscores.
    pub fn named(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == key)
            .map(|&(_, [r, g, b])| Color::rgb(r, g, b))
    }

    /// Formats as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        let Rgba([r, g, b, a]) = self.0;
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParseColorError::new(raw, "empty value"));
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| {
                ParseColorError::new(raw, "expected #rgb, #rrggbb or #rrggbbaa")
            });
        }
        if let Some(args) = fn_args(trimmed, "rgba").or_else(|| fn_args(trimmed, "rgb")) {
            return parse_components(&args).map_err(|reason| ParseColorError::new(raw, reason));
        }
        Color::named(trimmed).ok_or_else(|| ParseColorError::new(raw, "unknown color name"))
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    let nibble = |s: &str| byte(s).map(|n| (n << 4) | n);
    match hex.len() {
        3 => Some(Color::rgb(
            nibble(&hex[0..1])?,
            nibble(&hex[1..2])?,
            nibble(&hex[2..3])?,
        )),
        6 => Some(Color::rgb(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        8 => Some(Color::rgba(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => None,
    }
}

fn fn_args<'a>(input: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let open = input.find('(')?;
    let inner = input.strip_suffix(')')?.get(open + 1..)?;
    if !input[..open].trim().eq_ignore_ascii_case(name) {
        return None;
    }
    Some(inner.split(',').map(str::trim).collect())
}

fn parse_components(parts: &[&str]) -> Result<Color, String> {
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("expected 3 or 4 components, got {}", parts.len()));
    }
    let channel = |token: &str| -> Result<u8, String> {
        let value: f32 = token
            .parse()
            .map_err(|_| format!("invalid component '{}'", token))?;
        if !(0.0..=255.0).contains(&value) {
            return Err(format!("component '{}' must be between 0 and 255", token));
        }
        Ok(value.round() as u8)
    };
    let alpha = match parts.get(3) {
        // Fractional alpha in [0, 1], as in CSS.
        Some(token) => {
            let value: f32 = token
                .parse()
                .map_err(|_| format!("invalid alpha '{}'", token))?;
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("alpha '{}' must be between 0 and 1", token));
            }
            (value * 255.0).round() as u8
        }
        None => 255,
    };
    Ok(Color::rgba(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
    ("olive", [128, 128, 0]),
    ("maroon", [128, 0, 0]),
    ("gold", [255, 215, 0]),
    ("coral", [255, 127, 80]),
    ("salmon", [250, 128, 114]),
    ("violet", [238, 130, 238]),
    ("indigo", [75, 0, 130]),
    ("turquoise", [64, 224, 208]),
    ("chartreuse", [127, 255, 0]),
    ("crimson", [220, 20, 60]),
    ("darkgreen", [0, 100, 0]),
    ("darkblue", [0, 0, 139]),
    ("darkred", [139, 0, 0]),
    ("darkorange", [255, 140, 0]),
    ("lightblue", [173, 216, 230]),
    ("lightgreen", [144, 238, 144]),
    ("skyblue", [135, 206, 235]),
    ("deepskyblue", [0, 191, 255]),
    ("dodgerblue", [30, 144, 255]),
    ("royalblue", [65, 105, 225]),
    ("slategray", [112, 128, 144]),
    ("tomato", [255, 99, 71]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!("black".parse::<Color>(), Ok(Color::BLACK));
        assert_eq!("White".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("dark_green".parse::<Color>(), Ok(Color::rgb(0, 100, 0)));
        assert_eq!(
            "Slate Gray".parse::<Color>(),
            Ok(Color::rgb(112, 128, 144))
        );
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!("#f00".parse::<Color>(), Ok(Color::rgb(255, 0, 0)));
        assert_eq!("#00ff7f".parse::<Color>(), Ok(Color::rgb(0, 255, 127)));
        assert_eq!(
            "#10203040".parse::<Color>(),
            Ok(Color::rgba(0x10, 0x20, 0x30, 0x40))
        );
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_functional_colors() {
        assert_eq!("rgb(1, 2, 3)".parse::<Color>(), Ok(Color::rgb(1, 2, 3)));
        assert_eq!(
            "RGBA(10,20,30,0.5)".parse::<Color>(),
            Ok(Color::rgba(10, 20, 30, 128))
        );
        assert!("rgb(256, 0, 0)".parse::<Color>().is_err());
        assert!("rgb(1, 2)".parse::<Color>().is_err());
    }

    #[test]
    fn test_unknown_color_reports_input() {
        let err = "blurple".parse::<Color>().unwrap_err();
        assert_eq!(err.input, "blurple");
        assert!(err.to_string().contains("blurple"));
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_serde_uses_strings() {
        let color: Color = serde_json::from_str("\"navy\"").expect("parse");
        assert_eq!(color, Color::rgb(0, 0, 128));
        assert_eq!(serde_json::to_string(&color).expect("serialize"), "\"#000080\"");
    }
}
