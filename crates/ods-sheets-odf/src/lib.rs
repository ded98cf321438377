//! # ods-sheets-odf
//!
//! OpenDocument spreadsheet (`.ods`) reader and writer for ods-sheets.
//!
//! A package is a zip archive holding an uncompressed `mimetype` entry,
//! `content.xml` with the sheets and their automatic styles, `styles.xml`
//! with the document defaults, `meta.xml`, the images under `Pictures/`
//! and `META-INF/manifest.xml`.

pub mod error;
pub mod reader;
pub mod writer;

mod package;
mod styles;
mod xml;

pub use error::{OdsError, OdsResult};
pub use package::MIMETYPE;
pub use reader::OdsReader;
pub use writer::OdsWriter;
