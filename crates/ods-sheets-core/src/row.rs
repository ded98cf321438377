//! Row type

use crate::book::BookSettings;
use crate::cell::Cell;
use crate::error::{Error, OrderedKind, Result};
use crate::style::{StyleId, StyleRegistry};
use crate::units::Length;
use std::collections::BTreeMap;

/// Ratio between a font size and the row height needed to show it
const LINE_HEIGHT_FACTOR: f64 = 1.28;

/// How tall a row is
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RowHeight {
    /// The book's default row height
    #[default]
    Default,
    Explicit(Length),
    /// Tall enough for the largest font used by the row's cells
    Optimal,
}

/// A row of a [`Sheet`](crate::Sheet)
///
/// Cells are sparse and must be created left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    index: u32,
    cells: BTreeMap<u32, Cell>,
    height: RowHeight,
    style: Option<StyleId>,
}

impl Row {
    pub(crate) fn new(index: u32) -> Self {
        Self {
            index,
            cells: BTreeMap::new(),
            height: RowHeight::Default,
            style: None,
        }
    }

    /// Row index (0-based)
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Create the cell at column `col`
    ///
    /// `col` must be greater than every column created so far in this row.
    pub fn create_cell(&mut self, col: u32) -> Result<&mut Cell> {
        if let Some((&last, _)) = self.cells.last_key_value() {
            if col <= last {
                return Err(Error::order(OrderedKind::Cell, col, last));
            }
        }
        let row = self.index;
        Ok(self.cells.entry(col).or_insert_with(|| Cell::new(row, col)))
    }

    pub fn cell(&self, col: u32) -> Option<&Cell> {
        self.cells.get(&col)
    }

    pub fn cell_mut(&mut self, col: u32) -> Option<&mut Cell> {
        self.cells.get_mut(&col)
    }

    /// Cells in column order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.values_mut()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Highest column created so far
    pub fn last_col(&self) -> Option<u32> {
        self.cells.last_key_value().map(|(&c, _)| c)
    }

    pub fn height(&self) -> RowHeight {
        self.height
    }

    pub fn set_height(&mut self, height: Length) -> &mut Self {
        self.height = RowHeight::Explicit(height);
        self
    }

    /// Size the row for the biggest font among its cells when saved
    pub fn set_optimal_height_style(&mut self) -> &mut Self {
        self.height = RowHeight::Optimal;
        self
    }

    pub fn reset_height(&mut self) -> &mut Self {
        self.height = RowHeight::Default;
        self
    }

    /// Default style for cells of this row without their own style
    pub fn style(&self) -> Option<StyleId> {
        self.style
    }

    pub fn set_style(&mut self, style: StyleId) -> &mut Self {
        self.style = Some(style);
        self
    }

    /// Height this row gets when saved
    pub fn resolved_height(&self, styles: &StyleRegistry, settings: &BookSettings) -> Length {
        match self.height {
            RowHeight::Default => settings.default_row_height,
            RowHeight::Explicit(h) => h,
            RowHeight::Optimal => {
                let biggest = self
                    .cells
                    .values()
                    .filter_map(|c| c.style().or(self.style))
                    .filter_map(|id| styles.get(id))
                    .filter_map(|s| s.font_size())
                    .fold(settings.default_font_size, f64::max);
                Length::pt(biggest * LINE_HEIGHT_FACTOR).to_unit(crate::units::LengthUnit::Cm)
            }
        }
    }
}
