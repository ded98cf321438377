//! Border style types

use super::Color;
use crate::units::Length;
use bitflags::bitflags;

bitflags! {
    /// Sides of a cell a border applies to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BorderSides: u8 {
        const TOP = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;
        const ALL = Self::TOP.bits() | Self::BOTTOM.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl BorderSides {
    /// Each single side with its `fo:border-*` attribute suffix
    pub const EACH: [(BorderSides, &'static str); 4] = [
        (BorderSides::TOP, "top"),
        (BorderSides::BOTTOM, "bottom"),
        (BorderSides::LEFT, "left"),
        (BorderSides::RIGHT, "right"),
    ];
}

impl Default for BorderSides {
    fn default() -> Self {
        BorderSides::ALL
    }
}

/// Border width: a named preset or an explicit length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderWidth {
    #[default]
    Thin,
    Medium,
    Thick,
    Length(Length),
}

impl BorderWidth {
    /// Token used in the `fo:border` shorthand
    pub fn to_odf(&self) -> String {
        match self {
            BorderWidth::Thin => "thin".into(),
            BorderWidth::Medium => "medium".into(),
            BorderWidth::Thick => "thick".into(),
            BorderWidth::Length(l) => l.to_string(),
        }
    }

    pub fn from_odf(s: &str) -> Option<Self> {
        match s {
            "thin" => Some(BorderWidth::Thin),
            "medium" => Some(BorderWidth::Medium),
            "thick" => Some(BorderWidth::Thick),
            other => other.parse().ok().map(BorderWidth::Length),
        }
    }
}

impl From<Length> for BorderWidth {
    fn from(l: Length) -> Self {
        BorderWidth::Length(l)
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderLineStyle {
    /// No border
    None,
    /// Solid line
    #[default]
    Solid,
    /// Dotted line
    Dotted,
    /// Dashed line
    Dashed,
    /// Double line
    Double,
}

impl BorderLineStyle {
    pub fn to_odf(&self) -> &'static str {
        match self {
            BorderLineStyle::None => "none",
            BorderLineStyle::Solid => "solid",
            BorderLineStyle::Dotted => "dotted",
            BorderLineStyle::Dashed => "dashed",
            BorderLineStyle::Double => "double",
        }
    }

    pub fn from_odf(s: &str) -> Option<Self> {
        match s {
            "none" | "hidden" => Some(BorderLineStyle::None),
            "solid" => Some(BorderLineStyle::Solid),
            "dotted" => Some(BorderLineStyle::Dotted),
            "dashed" => Some(BorderLineStyle::Dashed),
            "double" => Some(BorderLineStyle::Double),
            _ => None,
        }
    }
}

/// A cell border: thin solid black on all sides unless changed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Border {
    color: Color,
    width: BorderWidth,
    line: BorderLineStyle,
    sides: BorderSides,
}

impl Border {
    /// Create a thin solid black border on all sides
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent copy of this border
    pub fn derive(&self) -> Border {
        self.clone()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    pub fn width(&self) -> BorderWidth {
        self.width
    }

    /// Set the width from a preset or a [`Length`]
    pub fn set_width<W: Into<BorderWidth>>(&mut self, width: W) -> &mut Self {
        self.width = width.into();
        self
    }

    pub fn line_style(&self) -> BorderLineStyle {
        self.line
    }

    pub fn set_line_style(&mut self, line: BorderLineStyle) -> &mut Self {
        self.line = line;
        self
    }

    pub fn sides(&self) -> BorderSides {
        self.sides
    }

    pub fn set_sides(&mut self, sides: BorderSides) -> &mut Self {
        self.sides = sides;
        self
    }

    /// Value of `fo:border` / `fo:border-<side>`, e.g. `medium solid #0000ff`
    pub fn to_odf(&self) -> String {
        format!(
            "{} {} {}",
            self.width.to_odf(),
            self.line.to_odf(),
            self.color.to_odf()
        )
    }

    /// Parse an `fo:border` shorthand, applying it to `sides`
    ///
    /// Returns `None` for `none` borders and for values it cannot read.
    pub fn from_odf(value: &str, sides: BorderSides) -> Option<Border> {
        let mut border = Border::new();
        border.sides = sides;
        let mut seen = false;
        for part in value.split_whitespace() {
            if let Some(line) = BorderLineStyle::from_odf(part) {
                border.line = line;
                seen = true;
            } else if let Some(color) = Color::from_hex(part).filter(|_| part.starts_with('#')) {
                border.color = color;
                seen = true;
            } else if let Some(width) = BorderWidth::from_odf(part) {
                border.width = width;
                seen = true;
            } else {
                return None;
            }
        }
        if !seen || border.line == BorderLineStyle::None {
            return None;
        }
        Some(border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_border() {
        let b = Border::new();
        assert_eq!(b.color(), Color::BLACK);
        assert_eq!(b.width(), BorderWidth::Thin);
        assert_eq!(b.line_style(), BorderLineStyle::Solid);
        assert_eq!(b.sides(), BorderSides::ALL);
        assert_eq!(b.to_odf(), "thin solid #000000");
    }

    #[test]
    fn test_derive_is_independent() {
        let mut base = Border::new();
        base.set_color(Color::BLUE).set_width(BorderWidth::Medium);

        let mut top = base.derive();
        top.set_sides(BorderSides::TOP)
            .set_color(Color::GREEN)
            .set_width("0.05in".parse::<Length>().unwrap());

        assert_eq!(base.color(), Color::BLUE);
        assert_eq!(base.sides(), BorderSides::ALL);
        assert_eq!(top.to_odf(), "0.05in solid #00ff00");
    }

    #[test]
    fn test_parse_shorthand() {
        let b = Border::from_odf("0.06pt solid #00ff00", BorderSides::LEFT).unwrap();
        assert_eq!(b.width(), BorderWidth::Length(Length::pt(0.06)));
        assert_eq!(b.color(), Color::GREEN);
        assert_eq!(b.sides(), BorderSides::LEFT);

        let b = Border::from_odf("medium dashed #0000ff", BorderSides::ALL).unwrap();
        assert_eq!(b.line_style(), BorderLineStyle::Dashed);
        assert_eq!(b.width(), BorderWidth::Medium);

        assert_eq!(Border::from_odf("none", BorderSides::ALL), None);
        assert_eq!(Border::from_odf("wobbly", BorderSides::ALL), None);
    }
}
