//! Readers that turn raw source bytes into table sets

mod csv;
mod encoding;
mod excel;
mod html;
mod memory;
mod zip;

use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::TableSet;

pub use self::csv::{sniff_delimiter, CsvReader, CsvSource};
pub use self::encoding::{decode, detect_encoding};
pub use self::excel::{ExcelReader, SheetSource};
pub use self::html::HtmlReader;
pub use self::memory::MemorySource;
pub use self::zip::ZipReader;

/// Trait for reading one kind of tabular source
pub trait TableReader: Send + Sync {
    /// Read every table found in the source bytes
    fn read(&self, name: &str, bytes: Vec<u8>, config: &Config) -> Result<TableSet>;

    /// Check if this reader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory choosing a reader by file extension or content
pub struct ReaderFactory {
    readers: Vec<Box<dyn TableReader>>,
}

impl Default for ReaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderFactory {
    /// Create a factory with all supported readers
    pub fn new() -> Self {
        let mut factory = Self::without_archives();
        factory.readers.push(Box::new(ZipReader));
        factory
    }

    /// Readers for plain files only; used for archive members
    pub fn without_archives() -> Self {
        Self {
            readers: vec![
                Box::new(CsvReader),
                Box::new(ExcelReader),
                Box::new(HtmlReader),
            ],
        }
    }

    /// Get a reader for a file name by its extension
    pub fn reader_for_name(&self, name: &str) -> Option<&dyn TableReader> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext.is_empty() {
            return None;
        }
        self.reader_for_format(&ext)
    }

    /// Get a reader for a format name such as `csv` or `xlsx`
    pub fn reader_for_format(&self, format: &str) -> Option<&dyn TableReader> {
        self.readers
            .iter()
            .find(|r| r.supports_extension(format))
            .map(|r| r.as_ref())
    }

    /// Read source bytes, choosing the reader by name and then by content
    pub fn read(&self, name: &str, bytes: Vec<u8>, config: &Config) -> Result<TableSet> {
        let reader = match self.reader_for_name(name) {
            Some(reader) => reader,
            None => {
                let format = detect_format(&bytes);
                debug!(source = name, format, "detected format from content");
                self.reader_for_format(format)
                    .ok_or_else(|| Error::UnsupportedFormat(format.to_string()))?
            }
        };

        let table_set = reader.read(name, bytes, config)?;
        info!(source = name, tables = table_set.len(), "opened source");
        match &config.table_name {
            Some(table) => table_set.select(table),
            None => Ok(table_set),
        }
    }

    /// Open a file from disk
    pub fn open(&self, path: &Path, config: &Config) -> Result<TableSet> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("input")
            .to_string();
        self.read(&name, bytes, config)
    }
}

/// Detect source format from content (for names without a known extension)
pub fn detect_format(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"PK\x03\x04") {
        if contains(bytes, b"[Content_Types].xml") {
            return "xlsx";
        }
        if contains(bytes, b"opendocument.spreadsheet") {
            return "ods";
        }
        return "zip";
    }

    if bytes.starts_with(b"\xD0\xCF\x11\xE0") {
        return "xls";
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]).to_lowercase();
    let trimmed = head.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with('<') && (trimmed.contains("<table") || trimmed.contains("<html")) {
        return "html";
    }

    "csv"
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"a,b\n1,2\n"), "csv");
        assert_eq!(detect_format(b"\xD0\xCF\x11\xE0\xA1\xB1"), "xls");
        assert_eq!(detect_format(b"  <!DOCTYPE html><html><table>"), "html");
        assert_eq!(detect_format(b"PK\x03\x04....[Content_Types].xml"), "xlsx");
        assert_eq!(detect_format(b"PK\x03\x04....data.csv"), "zip");
    }

    #[test]
    fn test_reader_for_name() {
        let factory = ReaderFactory::new();
        assert!(factory.reader_for_name("data.CSV").is_some());
        assert!(factory.reader_for_name("book.xlsx").is_some());
        assert!(factory.reader_for_name("bundle.zip").is_some());
        assert!(factory.reader_for_name("noext").is_none());
        assert!(factory.reader_for_name("data.parquet").is_none());

        let members = ReaderFactory::without_archives();
        assert!(members.reader_for_name("nested.zip").is_none());
    }

    #[test]
    fn test_read_sniffs_unknown_names() {
        let factory = ReaderFactory::new();
        let tables = factory
            .read("upload", b"a,b\n1,2\n".to_vec(), &Config::default())
            .unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables.names(), vec!["upload"]);
    }

    #[test]
    fn test_read_selects_table() {
        let factory = ReaderFactory::new();
        let html = b"<table id=\"a\"><tr><td>1</td></tr></table><table><tr><td>2</td></tr></table>";

        let config = Config::default().with_table_name("table_1");
        let tables = factory.read("page.html", html.to_vec(), &config).unwrap();
        assert_eq!(tables.names(), vec!["table_1"]);

        let config = Config::default().with_table_name("missing");
        let err = factory.read("page.html", html.to_vec(), &config).unwrap_err();
        assert!(matches!(err, Error::TableNotFound(_)));
    }
}
