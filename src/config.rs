//! Configuration handling for tablesift

use crate::guess::{HeaderGuessConfig, TypeGuessConfig};

/// Default number of raw rows in a sample
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Output format for the command line preview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Schema,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "schema" => Ok(OutputFormat::Schema),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Configuration for opening sources and running inference
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of raw rows pulled by `RowSet::sample`
    pub sample_size: usize,
    /// Field delimiter for delimited text; sniffed when unset
    pub delimiter: Option<u8>,
    /// Quote character for delimited text
    pub quote: u8,
    /// Strip leading whitespace from every delimited field
    pub skip_initial_space: bool,
    /// Character encoding label (WHATWG); detected when unset
    pub encoding: Option<String>,
    /// Only surface the table with this name
    pub table_name: Option<String>,
    /// Require unanimous conformance when guessing types
    pub strict: bool,
    /// Header guesser tunables
    pub headers: HeaderGuessConfig,
    /// Type guesser tunables
    pub types: TypeGuessConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            delimiter: None,
            quote: b'"',
            skip_initial_space: false,
            encoding: None,
            table_name: None,
            strict: false,
            headers: HeaderGuessConfig::default(),
            types: TypeGuessConfig::default(),
        }
    }
}

impl Config {
    /// Create a new Config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample bound
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Force a delimiter instead of sniffing one
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Enable stripping of leading field whitespace
    pub fn with_skip_initial_space(mut self, skip: bool) -> Self {
        self.skip_initial_space = skip;
        self
    }

    /// Force a character encoding
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Restrict the table set to one named table
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Enable strict type guessing
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the header guesser tunables
    pub fn with_header_guess(mut self, headers: HeaderGuessConfig) -> Self {
        self.headers = headers;
        self
    }

    /// Replace the type guesser tunables
    pub fn with_type_guess(mut self, types: TypeGuessConfig) -> Self {
        self.types = types;
        self
    }
}
