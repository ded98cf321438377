//! # ods-sheets-core
//!
//! Core data structures for the ods-sheets spreadsheet library.
//!
//! This crate provides the document model that the `ods-sheets-odf` crate
//! reads and writes:
//! - [`Book`], [`Sheet`], [`Row`], [`Cell`] - The document structure
//! - [`Value`] - Plain cell values (numbers, text, date/time)
//! - [`Formula`] - Arithmetic formulas over cell references
//! - [`Style`] and [`StyleRegistry`] - Cell, row and column formatting
//! - [`Tag`] - Generic element tree used for the XML parts
//!
//! ## Example
//!
//! ```rust
//! use ods_sheets_core::{Book, Formula, Op};
//!
//! let mut book = Book::new();
//! let sheet = book.create_sheet("Sheet1").unwrap();
//! let row = sheet.create_row(0).unwrap();
//!
//! let a1 = row.create_cell(0).unwrap().set_value(15).cell_ref();
//! let b1 = row.create_cell(1).unwrap().set_percentage_value(0.8, 2).cell_ref();
//!
//! let mut formula = Formula::new();
//! formula.add(a1).add(Op::Multiply).add(b1);
//! row.create_cell(2).unwrap().set_formula(formula);
//! ```

pub mod book;
pub mod cell;
pub mod draw;
pub mod error;
pub mod formula;
pub mod ns;
pub mod row;
pub mod sheet;
pub mod style;
pub mod tag;
pub mod units;
pub mod value;

// Re-exports for convenience
pub use book::{Book, BookSettings};
pub use cell::{Cell, CellContent, NumberFormat};
pub use draw::{DrawFrame, ImageHandle, Media, MediaId, MediaStore};
pub use error::{Error, OrderedKind, Result};
pub use formula::{CellRef, Formula, Grouping, Op, SheetDirectory, SheetNames, Token};
pub use row::{Row, RowHeight};
pub use sheet::{Sheet, SheetId};
pub use style::{
    Border, BorderLineStyle, BorderSides, BorderWidth, Color, HAlign, Style, StyleFamily, StyleId,
    StyleProperties, StyleRegistry, VAlign,
};
pub use tag::{Content, QName, Tag};
pub use units::{Length, LengthUnit, Point, Size};
pub use value::Value;
