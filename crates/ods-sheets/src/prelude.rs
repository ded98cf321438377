//! Prelude module - common imports for ods-sheets users
//!
//! ```rust
//! use ods_sheets::prelude::*;
//! ```

pub use crate::{
    // Main types
    Book,
    // Extension traits
    BookExt,
    Cell,
    CellRef,
    Color,

    // Error types
    Error,
    Formula,
    HAlign,
    Length,
    NumberFormat,

    // I/O types
    OdsError,
    OdsReader,
    OdsResult,
    OdsWriter,

    Op,
    Point,
    Result,
    Row,
    RowHeight,
    Sheet,
    Size,

    // Style types
    Border,
    BorderLineStyle,
    BorderSides,
    BorderWidth,
    Grouping,
    Style,
    StyleId,
    VAlign,
    Value,
};
