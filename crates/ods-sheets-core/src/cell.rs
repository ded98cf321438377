//! Cell type

use crate::draw::{DrawFrame, ImageHandle};
use crate::error::{Error, Result};
use crate::formula::{CellRef, Formula};
use crate::style::StyleId;
use crate::value::Value;

static UNSET: Value = Value::Unset;

/// How a numeric value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    #[default]
    General,
    /// `0.8` shown as `80.00%` with two decimals
    Percentage { decimals: u8 },
}

/// What a cell holds
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellContent {
    #[default]
    Empty,
    Value(Value),
    Formula(Formula),
}

/// A cell in a [`Row`](crate::Row)
///
/// A cell holds either a plain value or a formula, never both. Setting
/// one replaces the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    row: u32,
    col: u32,
    content: CellContent,
    number_format: NumberFormat,
    style: Option<StyleId>,
    row_span: u32,
    col_span: u32,
    frames: Vec<DrawFrame>,
}

impl Cell {
    pub(crate) fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            content: CellContent::Empty,
            number_format: NumberFormat::General,
            style: None,
            row_span: 1,
            col_span: 1,
            frames: Vec::new(),
        }
    }

    /// Row index (0-based)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column index (0-based)
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Reference to this cell for use in a formula on the same sheet
    ///
    /// Use [`CellRef::on`] when the formula lives on another sheet.
    pub fn cell_ref(&self) -> CellRef {
        CellRef::new(self.row, self.col)
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Value shown by the cell: the plain value, or a formula's cached result
    pub fn value(&self) -> &Value {
        match &self.content {
            CellContent::Empty => &UNSET,
            CellContent::Value(v) => v,
            CellContent::Formula(f) => f.value(),
        }
    }

    /// Store a plain value, dropping any formula
    pub fn set_value<V: Into<Value>>(&mut self, value: V) -> &mut Self {
        self.content = CellContent::Value(value.into());
        self.number_format = NumberFormat::General;
        self
    }

    /// Store `fraction` displayed as a percentage with `decimals` digits
    ///
    /// `set_percentage_value(0.8, 2)` shows `80.00%`.
    pub fn set_percentage_value(&mut self, fraction: f64, decimals: u8) -> &mut Self {
        self.content = CellContent::Value(Value::Double(fraction));
        self.number_format = NumberFormat::Percentage { decimals };
        self
    }

    pub fn has_formula(&self) -> bool {
        matches!(self.content, CellContent::Formula(_))
    }

    pub fn formula(&self) -> Option<&Formula> {
        match &self.content {
            CellContent::Formula(f) => Some(f),
            _ => None,
        }
    }

    pub fn formula_mut(&mut self) -> Option<&mut Formula> {
        match &mut self.content {
            CellContent::Formula(f) => Some(f),
            _ => None,
        }
    }

    /// Store a formula, dropping any plain value
    pub fn set_formula(&mut self, formula: Formula) -> &mut Self {
        self.content = CellContent::Formula(formula);
        self
    }

    /// Remove value or formula
    pub fn clear(&mut self) -> &mut Self {
        self.content = CellContent::Empty;
        self.number_format = NumberFormat::General;
        self
    }

    /// True when the cell has no content, style, span or images
    pub fn is_blank(&self) -> bool {
        self.content == CellContent::Empty
            && self.style.is_none()
            && self.row_span == 1
            && self.col_span == 1
            && self.frames.is_empty()
    }

    pub fn number_format(&self) -> NumberFormat {
        self.number_format
    }

    pub fn set_number_format(&mut self, format: NumberFormat) -> &mut Self {
        self.number_format = format;
        self
    }

    pub fn style(&self) -> Option<StyleId> {
        self.style
    }

    pub fn set_style(&mut self, style: StyleId) -> &mut Self {
        self.style = Some(style);
        self
    }

    pub fn clear_style(&mut self) -> &mut Self {
        self.style = None;
        self
    }

    pub fn row_span(&self) -> u32 {
        self.row_span
    }

    pub fn col_span(&self) -> u32 {
        self.col_span
    }

    pub fn is_spanning(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    /// Make the cell cover `rows` x `cols` slots starting at itself
    ///
    /// Spans are at least 1x1 and can only grow.
    pub fn set_row_col_span(&mut self, rows: u32, cols: u32) -> Result<&mut Self> {
        if rows == 0 || cols == 0 || rows < self.row_span || cols < self.col_span {
            return Err(Error::InvalidSpan { rows, cols });
        }
        self.row_span = rows;
        self.col_span = cols;
        Ok(self)
    }

    /// True when (row, col) lies inside this cell's span, excluding itself
    pub fn covers(&self, row: u32, col: u32) -> bool {
        let in_rows = row >= self.row && (row - self.row) < self.row_span;
        let in_cols = col >= self.col && (col - self.col) < self.col_span;
        in_rows && in_cols && (row, col) != (self.row, self.col)
    }

    /// Place an image on this cell at its natural size
    pub fn create_draw_frame(&mut self, image: &ImageHandle) -> &mut DrawFrame {
        self.frames.push(DrawFrame::new(image));
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn draw_frames(&self) -> &[DrawFrame] {
        &self.frames
    }

    /// Text of the value the way it appears in the cell's paragraph
    pub fn display_text(&self) -> String {
        match (self.value(), self.number_format) {
            (Value::Double(n), NumberFormat::Percentage { decimals }) => {
                format_percentage(*n, decimals)
            }
            (value, _) => value.to_string(),
        }
    }
}

/// `0.8` with 2 decimals is `80.00%`
pub fn format_percentage(fraction: f64, decimals: u8) -> String {
    format!("{:.*}%", decimals as usize, fraction * 100.0)
}
