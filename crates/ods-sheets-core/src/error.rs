//! Error types for ods-sheets-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Which ascending-ordered container rejected an index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedKind {
    /// Rows of a sheet
    Row,
    /// Cells of a row
    Cell,
    /// Column widths of a sheet
    Column,
}

impl OrderedKind {
    fn as_str(&self) -> &'static str {
        match self {
            OrderedKind::Row => "row",
            OrderedKind::Cell => "cell",
            OrderedKind::Column => "column width",
        }
    }
}

impl std::fmt::Display for OrderedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in ods-sheets-core
#[derive(Debug, Error)]
pub enum Error {
    /// A sheet with this name already exists in the book
    #[error("Sheet name already exists: {0}")]
    DuplicateName(String),

    /// Rows, cells and column widths must be created in strictly ascending order
    #[error("{kind} {index} created out of order (last created: {last})")]
    OrderViolation {
        kind: OrderedKind,
        index: u32,
        last: u32,
    },

    /// Lookup miss (sheet, style, media)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Length string that is not `<number><unit>`
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// Row or column span of zero, or an attempt to shrink a span
    #[error("Invalid span {rows}x{cols}: spans are at least 1x1 and only grow")]
    InvalidSpan { rows: u32, cols: u32 },

    /// A cell was created in a slot covered by another cell's span
    #[error("Cell at row {row}, column {col} of sheet '{sheet}' lies under a span")]
    SpanOverlap { sheet: String, row: u32, col: u32 },

    /// Image bytes that could not be recognized
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// IO error while loading media
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    pub(crate) fn order(kind: OrderedKind, index: u32, last: u32) -> Self {
        Error::OrderViolation { kind, index, last }
    }
}
