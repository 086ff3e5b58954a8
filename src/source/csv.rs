//! Delimited text reader (CSV, TSV, semicolon separated)

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::model::{RawRows, RowSet, RowSource, TableSet, Value};

use super::encoding::decode;
use super::TableReader;

/// Delimiters considered when sniffing, in order of preference
const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

/// Lines inspected when sniffing a delimiter
const SNIFF_LINES: usize = 50;

/// Reader for delimited text files
pub struct CsvReader;

impl TableReader for CsvReader {
    fn read(&self, name: &str, bytes: Vec<u8>, config: &Config) -> Result<TableSet> {
        let text = decode(&bytes, config.encoding.as_deref())?;
        let delimiter = match config.delimiter {
            Some(delimiter) => delimiter,
            None => sniff_delimiter(&text, config.quote),
        };
        debug!(table = name, delimiter = %(delimiter as char), "opened delimited text");

        let source = CsvSource::new(text, delimiter)
            .with_quote(config.quote)
            .with_skip_initial_space(config.skip_initial_space);
        let row_set = RowSet::new(name, source).with_sample_size(config.sample_size);
        Ok(TableSet::new(name, vec![row_set]))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt" | "ssv" | "tab")
    }
}

/// Decoded delimited text, re-read from the start on every pull
#[derive(Debug, Clone)]
pub struct CsvSource {
    text: String,
    delimiter: u8,
    quote: u8,
    skip_initial_space: bool,
}

impl CsvSource {
    pub fn new(text: impl Into<String>, delimiter: u8) -> Self {
        Self {
            text: text.into(),
            delimiter,
            quote: b'"',
            skip_initial_space: false,
        }
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_skip_initial_space(mut self, skip: bool) -> Self {
        self.skip_initial_space = skip;
        self
    }

    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote);
        builder
    }
}

impl RowSource for CsvSource {
    fn rows(&self) -> Result<RawRows<'_>> {
        let reader = self.reader_builder().from_reader(self.text.as_bytes());
        let skip = self.skip_initial_space;
        Ok(Box::new(reader.into_records().map(move |record| -> Result<Vec<Value>> {
            let record = record?;
            Ok(record
                .iter()
                .map(|field| {
                    let field = if skip { field.trim_start() } else { field };
                    Value::String(field.to_string())
                })
                .collect())
        })))
    }
}

/// Pick the delimiter giving the most uniform multi-column rows
pub fn sniff_delimiter(text: &str, quote: u8) -> u8 {
    let head: String = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    let mut best = (b',', 0.0f64, 0usize);
    for &delimiter in CANDIDATE_DELIMITERS {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .quote(quote)
            .from_reader(head.as_bytes());

        let widths: Vec<usize> = reader
            .records()
            .filter_map(|r| r.ok())
            .map(|r| r.len())
            .collect();
        let Some((width, freq)) = modal(&widths) else {
            continue;
        };
        if width < 2 {
            continue;
        }
        let uniformity = freq as f64 / widths.len() as f64;
        if uniformity > best.1 || (uniformity == best.1 && width > best.2) {
            best = (delimiter, uniformity, width);
        }
    }
    best.0
}

fn modal(widths: &[usize]) -> Option<(usize, usize)> {
    let mut counts: indexmap::IndexMap<usize, usize> = indexmap::IndexMap::new();
    for &w in widths {
        *counts.entry(w).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(width, freq)| (freq, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "date,temperature,place\n2011-01-01,1,Galway\n2011-01-02,-1,Galway\n";

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter(SIMPLE, b'"'), b',');
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n", b'"'), b';');
        assert_eq!(sniff_delimiter("a\tb\n1\t2,5\n", b'"'), b'\t');
        assert_eq!(sniff_delimiter("single\ncolumn\n", b'"'), b',');
    }

    #[test]
    fn test_read_rows() {
        let table_set = CsvReader
            .read("simple.csv", SIMPLE.as_bytes().to_vec(), &Config::default())
            .unwrap();
        let row_set = &table_set.tables()[0];
        assert_eq!(row_set.name(), "simple.csv");
        let rows = row_set.all_rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][1].value(), &Value::from("temperature"));
        assert!(rows.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_forced_delimiter() {
        let config = Config::default().with_delimiter(b';');
        let table_set = CsvReader
            .read("simple.csv", SIMPLE.as_bytes().to_vec(), &config)
            .unwrap();
        let rows = table_set.tables()[0].sample_rows().unwrap();
        assert_eq!(rows[0].len(), 1);
    }

    #[test]
    fn test_skip_initial_space() {
        let text = "hello,    goodbye\n";
        let padded = CsvSource::new(text, b',');
        let first = padded.rows().unwrap().next().unwrap().unwrap();
        assert_eq!(first[1], Value::from("    goodbye"));

        let trimmed = CsvSource::new(text, b',').with_skip_initial_space(true);
        let first = trimmed.rows().unwrap().next().unwrap().unwrap();
        assert_eq!(first[1], Value::from("goodbye"));
    }

    #[test]
    fn test_ragged_rows_are_kept() {
        let source = CsvSource::new("a,b,c\n1\n2,3\n", b',');
        let widths: Vec<usize> = source.rows().unwrap().map(|r| r.unwrap().len()).collect();
        assert_eq!(widths, vec![3, 1, 2]);
    }
}
