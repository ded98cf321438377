//! # ods-sheets
//!
//! A Rust library for building, reading and writing OpenDocument
//! spreadsheets (`.ods`).
//!
//! ## Features
//!
//! - Sheets, rows and cells built in ascending order
//! - Numbers, text, percentages and dates
//! - Formulas over cell references, across sheets
//! - Shared cell styles: fonts, colors, alignment, borders
//! - Column widths, row heights, cell spans and images
//!
//! ## Example
//!
//! ```rust,no_run
//! use ods_sheets::prelude::*;
//!
//! let mut book = Book::new();
//! let bold = book.create_cell_style();
//! book.style_mut(bold).unwrap().set_bold(true);
//!
//! let sheet = book.create_sheet("Prices").unwrap();
//! let row = sheet.create_row(0).unwrap();
//! let a1 = row.create_cell(0).unwrap().set_value(15).set_style(bold).cell_ref();
//! let b1 = row.create_cell(1).unwrap().set_percentage_value(0.8, 2).cell_ref();
//!
//! let mut formula = Formula::new();
//! formula.add(a1).add(Op::Multiply).add(b1);
//! row.create_cell(2).unwrap().set_formula(formula);
//!
//! book.save("prices.ods").unwrap();
//! ```

pub mod prelude;

// Re-export core types
pub use ods_sheets_core::{
    // Main types
    Book,
    BookSettings,
    Cell,
    CellContent,
    Row,
    RowHeight,
    Sheet,
    SheetId,

    // Values and formulas
    CellRef,
    Formula,
    Grouping,
    NumberFormat,
    Op,
    SheetDirectory,
    SheetNames,
    Token,
    Value,

    // Style types
    Border,
    BorderLineStyle,
    BorderSides,
    BorderWidth,
    Color,
    HAlign,
    Style,
    StyleFamily,
    StyleId,
    StyleProperties,
    StyleRegistry,
    VAlign,

    // Images
    DrawFrame,
    ImageHandle,
    Media,
    MediaId,
    MediaStore,

    // Units
    Length,
    LengthUnit,
    Point,
    Size,

    // Element tree
    Content,
    QName,
    Tag,

    // Error types
    Error,
    OrderedKind,
    Result,
};

// Re-export I/O types
pub use ods_sheets_odf::{OdsError, OdsReader, OdsResult, OdsWriter, MIMETYPE};

use std::path::Path;

/// Extension trait for Book to add file I/O
pub trait BookExt: Sized {
    /// Open a book from an `.ods` file
    fn open<P: AsRef<Path>>(path: P) -> OdsResult<Self>;

    /// Save the book to an `.ods` file
    ///
    /// The target is replaced only once the whole package has been
    /// written.
    fn save<P: AsRef<Path>>(&self, path: P) -> OdsResult<()>;
}

impl BookExt for Book {
    fn open<P: AsRef<Path>>(path: P) -> OdsResult<Book> {
        OdsReader::read_file(path)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> OdsResult<()> {
        OdsWriter::write_file(self, path)
    }
}
