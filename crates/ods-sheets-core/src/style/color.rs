//! Color representation

use std::fmt;

/// An RGB color with an optional alpha channel
///
/// ODF stores colors as `#rrggbb`; the alpha channel is kept on the model
/// but does not survive a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<u8>,
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: None }
    }

    /// Create an RGBA color
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Create from a hex string (e.g., "#FF0000", "ff0000" or "#80FF0000" with alpha first)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::rgb(r, g, b))
            }
            8 => {
                let a = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let r = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let g = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let b = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Color::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// `#rrggbb` form used by `fo:color`, `fo:background-color` and borders
    pub fn to_odf(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Same color without its alpha channel
    pub fn opaque(&self) -> Self {
        Color::rgb(self.r, self.g, self.b)
    }

    // Common colors
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            None => write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b),
            Some(a) => write!(f, "#{:02X}{:02X}{:02X}{:02X}", a, self.r, self.g, self.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::GREEN));
        assert_eq!(
            Color::from_hex("#80FFFFFF"),
            Some(Color::rgba(255, 255, 255, 128))
        );
        assert_eq!(Color::from_hex("#FFF"), None);
        assert_eq!(Color::from_hex("transparent"), None);
    }

    #[test]
    fn test_to_odf() {
        assert_eq!(Color::rgb(200, 0, 0).to_odf(), "#c80000");
        assert_eq!(Color::rgba(255, 255, 0, 10).to_odf(), "#ffff00");
        assert_eq!(
            Color::from_hex(&Color::rgb(1, 2, 3).to_odf()),
            Some(Color::rgb(1, 2, 3))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::BLUE.to_string(), "#0000FF");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#04010203");
    }
}
