//! Sheet type

use crate::cell::Cell;
use crate::error::{Error, OrderedKind, Result};
use crate::row::Row;
use crate::units::Length;
use std::collections::BTreeMap;
use std::fmt;

/// Stable identity of a sheet within its book
///
/// Ids are assigned by [`Book::create_sheet`](crate::Book::create_sheet)
/// and do not change when other sheets are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(u32);

impl SheetId {
    pub const fn new(raw: u32) -> Self {
        SheetId(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sheet (one `table:table`)
///
/// Rows and column widths are sparse and must be created in ascending
/// index order. Missing rows, cells and widths are written as defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    id: SheetId,
    name: String,
    rows: BTreeMap<u32, Row>,
    column_widths: BTreeMap<u32, Length>,
}

impl Sheet {
    pub(crate) fn new(id: SheetId, name: String) -> Self {
        Self {
            id,
            name,
            rows: BTreeMap::new(),
            column_widths: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> SheetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the row at `index`
    ///
    /// `index` must be greater than every row created so far.
    pub fn create_row(&mut self, index: u32) -> Result<&mut Row> {
        if let Some((&last, _)) = self.rows.last_key_value() {
            if index <= last {
                return Err(Error::order(OrderedKind::Row, index, last));
            }
        }
        Ok(self.rows.entry(index).or_insert_with(|| Row::new(index)))
    }

    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }

    pub fn row_mut(&mut self, index: u32) -> Option<&mut Row> {
        self.rows.get_mut(&index)
    }

    /// Rows in index order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.values_mut()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Highest row created so far
    pub fn last_row(&self) -> Option<u32> {
        self.rows.last_key_value().map(|(&r, _)| r)
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.rows.get(&row)?.cell(col)
    }

    pub fn cell_mut(&mut self, row: u32, col: u32) -> Option<&mut Cell> {
        self.rows.get_mut(&row)?.cell_mut(col)
    }

    /// All cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.values().flat_map(|r| r.cells())
    }

    /// Set the width of column `col`
    ///
    /// Widths must be set in ascending column order; unset columns use the
    /// book's default width.
    pub fn set_column_width(&mut self, col: u32, width: Length) -> Result<()> {
        if let Some((&last, _)) = self.column_widths.last_key_value() {
            if col <= last {
                return Err(Error::order(OrderedKind::Column, col, last));
            }
        }
        self.column_widths.insert(col, width);
        Ok(())
    }

    pub fn column_width(&self, col: u32) -> Option<Length> {
        self.column_widths.get(&col).copied()
    }

    /// Explicit column widths in column order
    pub fn column_widths(&self) -> impl Iterator<Item = (u32, Length)> + '_ {
        self.column_widths.iter().map(|(&c, &w)| (c, w))
    }

    /// The spanning cell whose area contains (row, col), if any
    pub fn covering_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.rows
            .range(..=row)
            .flat_map(|(_, r)| r.cells())
            .find(|c| c.is_spanning() && c.covers(row, col))
    }

    /// Check that no cell was created inside another cell's span
    pub fn check_spans(&self) -> Result<()> {
        for anchor in self.cells().filter(|c| c.is_spanning()) {
            let rows = anchor.row()..anchor.row().saturating_add(anchor.row_span());
            let cols = anchor.col()..anchor.col().saturating_add(anchor.col_span());
            for (_, row) in self.rows.range(rows) {
                for cell in row.cells() {
                    if cols.contains(&cell.col())
                        && (cell.row(), cell.col()) != (anchor.row(), anchor.col())
                    {
                        return Err(Error::SpanOverlap {
                            sheet: self.name.clone(),
                            row: cell.row(),
                            col: cell.col(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Column count needed to hold every cell, span and width
    pub fn used_columns(&self) -> u32 {
        let from_cells = self
            .cells()
            .map(|c| c.col().saturating_add(c.col_span()))
            .max()
            .unwrap_or(0);
        let from_widths = self
            .column_widths
            .last_key_value()
            .map(|(&c, _)| c + 1)
            .unwrap_or(0);
        from_cells.max(from_widths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Sheet {
        Sheet::new(SheetId::new(0), "Sheet1".into())
    }

    #[test]
    fn test_rows_ascending() {
        let mut s = sheet();
        s.create_row(0).unwrap();
        s.create_row(5).unwrap();
        assert!(matches!(
            s.create_row(2),
            Err(Error::OrderViolation {
                kind: OrderedKind::Row,
                index: 2,
                last: 5
            })
        ));
        assert_eq!(s.row_count(), 2);
        assert_eq!(s.row(5).unwrap().index(), 5);
        assert!(s.row(2).is_none());
    }

    #[test]
    fn test_column_widths_ascending() {
        let mut s = sheet();
        s.set_column_width(0, "5.0cm".parse().unwrap()).unwrap();
        s.set_column_width(7, "3.92in".parse().unwrap()).unwrap();
        let err = s.set_column_width(2, Length::inches(0.5)).unwrap_err();
        assert!(matches!(
            err,
            Error::OrderViolation {
                kind: OrderedKind::Column,
                ..
            }
        ));
        assert_eq!(s.column_width(7), Some(Length::inches(3.92)));
        assert_eq!(s.column_width(2), None);
        assert_eq!(s.used_columns(), 8);
    }

    #[test]
    fn test_cell_lookup() {
        let mut s = sheet();
        s.create_row(2).unwrap().create_cell(1).unwrap().set_value(15);
        assert_eq!(s.cell(2, 1).unwrap().value().as_double(), Some(15.0));
        assert!(s.cell(2, 0).is_none());
        assert!(s.cell(3, 1).is_none());
    }

    #[test]
    fn test_span_overlap() {
        let mut s = sheet();
        let row = s.create_row(0).unwrap();
        row.create_cell(0)
            .unwrap()
            .set_value("string")
            .set_row_col_span(2, 4)
            .unwrap();
        s.check_spans().unwrap();

        s.create_row(1).unwrap().create_cell(2).unwrap().set_value("hidden");
        assert_eq!(s.covering_cell(1, 2).map(|c| (c.row(), c.col())), Some((0, 0)));
        assert!(s.covering_cell(2, 2).is_none());
        assert!(matches!(
            s.check_spans(),
            Err(Error::SpanOverlap { row: 1, col: 2, .. })
        ));
    }
}
