//! Physical lengths, sizes and offsets

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Unit of a [`Length`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthUnit {
    Cm,
    Mm,
    In,
    Pt,
    Pc,
    Px,
}

impl LengthUnit {
    /// Suffix used in ODF attribute values
    pub fn suffix(&self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::In => "in",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::Px => "px",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cm" => Some(LengthUnit::Cm),
            "mm" => Some(LengthUnit::Mm),
            "in" | "inch" => Some(LengthUnit::In),
            "pt" => Some(LengthUnit::Pt),
            "pc" => Some(LengthUnit::Pc),
            "px" => Some(LengthUnit::Px),
            _ => None,
        }
    }

    /// Points per one unit (px at 96 dpi)
    fn points(&self) -> f64 {
        match self {
            LengthUnit::Cm => 72.0 / 2.54,
            LengthUnit::Mm => 72.0 / 25.4,
            LengthUnit::In => 72.0,
            LengthUnit::Pt => 1.0,
            LengthUnit::Pc => 12.0,
            LengthUnit::Px => 0.75,
        }
    }
}

/// A physical length such as `5.0cm` or `0.5in`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn cm(value: f64) -> Self {
        Self::new(value, LengthUnit::Cm)
    }

    pub const fn inches(value: f64) -> Self {
        Self::new(value, LengthUnit::In)
    }

    pub const fn pt(value: f64) -> Self {
        Self::new(value, LengthUnit::Pt)
    }

    pub const fn px(value: f64) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    /// Value expressed in points
    pub fn to_points(&self) -> f64 {
        self.value * self.unit.points()
    }

    /// Same length expressed in another unit
    pub fn to_unit(&self, unit: LengthUnit) -> Length {
        Length::new(self.to_points() / unit.points(), unit)
    }

    /// Physical equality regardless of unit (within a micro-point)
    pub fn same_as(&self, other: &Length) -> bool {
        (self.to_points() - other.to_points()).abs() < 1e-6
    }

    /// Bit pattern used for hashing, with `-0.0` folded into `0.0`
    pub(crate) fn key(&self) -> (u64, LengthUnit) {
        let value = if self.value == 0.0 { 0.0 } else { self.value };
        (value.to_bits(), self.unit)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parse `"<number><unit>"`, e.g. `"5.0cm"`, `"0.5in"`, `"12pt"`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| Error::InvalidLength(format!("missing unit in '{}'", s)))?;
        let (number, unit) = s.split_at(split);
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLength(format!("invalid number in '{}'", s)))?;
        if !value.is_finite() {
            return Err(Error::InvalidLength(format!("non-finite value in '{}'", s)));
        }
        let unit = LengthUnit::from_suffix(unit)
            .ok_or_else(|| Error::InvalidLength(format!("unknown unit '{}' in '{}'", unit, s)))?;
        Ok(Length::new(value, unit))
    }
}

impl std::hash::Hash for Length {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Eq for Length {}

/// Width and height of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: Length,
    pub height: Length,
}

impl Size {
    pub const fn new(width: Length, height: Length) -> Self {
        Self { width, height }
    }

    /// Size in screen pixels
    pub fn pixels(width: u32, height: u32) -> Self {
        Self::new(Length::px(width as f64), Length::px(height as f64))
    }
}

/// Offset of a frame relative to its anchor cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: Length,
    pub y: Length,
}

impl Point {
    pub const fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    /// Offset in screen pixels
    pub fn pixels(x: i32, y: i32) -> Self {
        Self::new(Length::px(x as f64), Length::px(y as f64))
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(Length::cm(0.0), Length::cm(0.0))
    }
}
