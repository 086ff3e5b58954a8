//! Error types for opening and reading sources

use thiserror::Error;

/// Result type for tablesift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by format collaborators while decoding a source.
///
/// Type coercion mismatches and inconclusive guesses are not errors; they
/// never reach this type.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet could not be decoded
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Archive could not be read
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// HTML document could not be processed
    #[error("HTML error: {0}")]
    Html(String),

    /// Unknown or unusable character encoding
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// No collaborator understands the source
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Requested table is not part of the table set
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}
