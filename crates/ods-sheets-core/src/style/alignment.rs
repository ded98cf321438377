//! Text alignment types

/// Horizontal alignment of cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl HAlign {
    /// Value of `fo:text-align`
    pub fn to_odf(&self) -> &'static str {
        match self {
            HAlign::Left => "start",
            HAlign::Center => "center",
            HAlign::Right => "end",
            HAlign::Justify => "justify",
        }
    }

    pub fn from_odf(s: &str) -> Option<Self> {
        match s {
            "start" | "left" => Some(HAlign::Left),
            "center" => Some(HAlign::Center),
            "end" | "right" => Some(HAlign::Right),
            "justify" => Some(HAlign::Justify),
            _ => None,
        }
    }
}

/// Vertical alignment of cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    /// Value of `style:vertical-align`
    pub fn to_odf(&self) -> &'static str {
        match self {
            VAlign::Top => "top",
            VAlign::Middle => "middle",
            VAlign::Bottom => "bottom",
        }
    }

    pub fn from_odf(s: &str) -> Option<Self> {
        match s {
            "top" => Some(VAlign::Top),
            "middle" => Some(VAlign::Middle),
            "bottom" => Some(VAlign::Bottom),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odf_names() {
        for h in [HAlign::Left, HAlign::Center, HAlign::Right, HAlign::Justify] {
            assert_eq!(HAlign::from_odf(h.to_odf()), Some(h));
        }
        for v in [VAlign::Top, VAlign::Middle, VAlign::Bottom] {
            assert_eq!(VAlign::from_odf(v.to_odf()), Some(v));
        }
        assert_eq!(HAlign::from_odf("left"), Some(HAlign::Left));
        assert_eq!(VAlign::from_odf("automatic"), None);
    }
}
