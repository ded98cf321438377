//! Cell styling types
//!
//! This module contains types for cell formatting:
//! - [`Style`] - A style of one [`StyleFamily`] with its property bag
//! - [`StyleRegistry`] - Arena owning every style of a book
//! - [`Border`] - Cell borders
//! - [`HAlign`] / [`VAlign`] - Text alignment
//! - [`Color`] - Color representation

mod alignment;
mod border;
mod color;
mod registry;

pub use alignment::{HAlign, VAlign};
pub use border::{Border, BorderLineStyle, BorderSides, BorderWidth};
pub use color::Color;
pub use registry::{StyleId, StyleRegistry};

/// What kind of element a style applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleFamily {
    TableCell,
    TableRow,
    TableColumn,
    Table,
}

impl StyleFamily {
    /// Value of `style:family`
    pub fn to_odf(&self) -> &'static str {
        match self {
            StyleFamily::TableCell => "table-cell",
            StyleFamily::TableRow => "table-row",
            StyleFamily::TableColumn => "table-column",
            StyleFamily::Table => "table",
        }
    }

    pub fn from_odf(s: &str) -> Option<Self> {
        match s {
            "table-cell" => Some(StyleFamily::TableCell),
            "table-row" => Some(StyleFamily::TableRow),
            "table-column" => Some(StyleFamily::TableColumn),
            "table" => Some(StyleFamily::Table),
            _ => None,
        }
    }

    /// Prefix of generated style names (`ce1`, `ro1`, `co1`, `ta1`)
    pub fn name_prefix(&self) -> &'static str {
        match self {
            StyleFamily::TableCell => "ce",
            StyleFamily::TableRow => "ro",
            StyleFamily::TableColumn => "co",
            StyleFamily::Table => "ta",
        }
    }
}

/// Formatting properties of a style
///
/// Unset options inherit the application defaults when the document is
/// opened.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleProperties {
    pub font_name: Option<String>,
    /// Font size in points
    pub font_size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub text_color: Option<Color>,
    pub background: Option<Color>,
    pub h_align: Option<HAlign>,
    pub v_align: Option<VAlign>,
    pub wrap: bool,
    pub border: Option<Border>,
}

impl StyleProperties {
    /// True when no property is set
    pub fn is_default(&self) -> bool {
        *self == StyleProperties::default()
    }
}

impl std::hash::Hash for StyleProperties {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.font_name.hash(state);
        self.font_size.map(f64::to_bits).hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.text_color.hash(state);
        self.background.hash(state);
        self.h_align.hash(state);
        self.v_align.hash(state);
        self.wrap.hash(state);
        self.border.hash(state);
    }
}

impl Eq for StyleProperties {}

/// A style owned by the book's [`StyleRegistry`]
///
/// Cells and rows refer to styles through [`StyleId`] handles. Setters
/// change only this style; use [`StyleRegistry::derive`] to get an
/// independent copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    family: StyleFamily,
    name: String,
    props: StyleProperties,
}

impl Style {
    pub(crate) fn new(family: StyleFamily, name: String) -> Self {
        Self {
            family,
            name,
            props: StyleProperties::default(),
        }
    }

    pub fn family(&self) -> StyleFamily {
        self.family
    }

    /// Placeholder (`ce-tmp3`) or, for styles read from a file, the
    /// automatic style name they were read from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &StyleProperties {
        &self.props
    }

    pub fn properties_mut(&mut self) -> &mut StyleProperties {
        &mut self.props
    }

    pub fn font_name(&self) -> Option<&str> {
        self.props.font_name.as_deref()
    }

    pub fn set_font_name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.props.font_name = Some(name.into());
        self
    }

    pub fn font_size(&self) -> Option<f64> {
        self.props.font_size
    }

    /// Set font size in points
    pub fn set_font_size(&mut self, points: f64) -> &mut Self {
        self.props.font_size = Some(points);
        self
    }

    pub fn bold(&self) -> bool {
        self.props.bold
    }

    pub fn set_bold(&mut self, bold: bool) -> &mut Self {
        self.props.bold = bold;
        self
    }

    pub fn italic(&self) -> bool {
        self.props.italic
    }

    pub fn set_italic(&mut self, italic: bool) -> &mut Self {
        self.props.italic = italic;
        self
    }

    pub fn text_color(&self) -> Option<Color> {
        self.props.text_color
    }

    pub fn set_text_color(&mut self, color: Color) -> &mut Self {
        self.props.text_color = Some(color);
        self
    }

    pub fn background(&self) -> Option<Color> {
        self.props.background
    }

    pub fn set_background(&mut self, color: Color) -> &mut Self {
        self.props.background = Some(color);
        self
    }

    pub fn h_align(&self) -> Option<HAlign> {
        self.props.h_align
    }

    pub fn set_h_align(&mut self, align: HAlign) -> &mut Self {
        self.props.h_align = Some(align);
        self
    }

    pub fn v_align(&self) -> Option<VAlign> {
        self.props.v_align
    }

    pub fn set_v_align(&mut self, align: VAlign) -> &mut Self {
        self.props.v_align = Some(align);
        self
    }

    pub fn wrap(&self) -> bool {
        self.props.wrap
    }

    /// Enable text wrapping
    pub fn set_wrap(&mut self, wrap: bool) -> &mut Self {
        self.props.wrap = wrap;
        self
    }

    pub fn border(&self) -> Option<&Border> {
        self.props.border.as_ref()
    }

    /// Attach a copy of `border` to this style
    pub fn set_border(&mut self, border: &Border) -> &mut Self {
        self.props.border = Some(border.clone());
        self
    }

    pub fn clear_border(&mut self) -> &mut Self {
        self.props.border = None;
        self
    }
}
