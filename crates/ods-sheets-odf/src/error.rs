//! ODS error types

use thiserror::Error;

/// Result type for ODS operations
pub type OdsResult<T> = std::result::Result<T, OdsError>;

/// Errors that can occur during ODS reading/writing
#[derive(Debug, Error)]
pub enum OdsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The finished temporary file could not be moved over the target
    #[error("Could not replace target file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Invalid file format
    #[error("Invalid ODS format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] ods_sheets_core::Error),
}
