//! tablesift - Structure inference for messy tabular data

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tablesift::config::{Config, OutputFormat, DEFAULT_SAMPLE_SIZE};
use tablesift::output::render_to_stdout;
use tablesift::preview::preview;
use tablesift::source::ReaderFactory;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
    Schema,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Schema => OutputFormat::Schema,
        }
    }
}

/// Guess headers and column types of tabular files (CSV, Excel, HTML, ZIP)
#[derive(Parser, Debug)]
#[command(name = "tablesift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to inspect
    file: PathBuf,

    /// Only inspect the table with this name
    #[arg(short, long)]
    table: Option<String>,

    /// Require every sampled value to conform to the guessed type
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: CliOutputFormat,

    /// Number of source rows sampled for guessing
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// Field delimiter for delimited text (sniffed when omitted)
    #[arg(short, long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Character encoding label, e.g. utf-8, latin1, utf-16le
    #[arg(short, long)]
    encoding: Option<String>,

    /// Strip leading whitespace from delimited fields
    #[arg(long)]
    skip_initial_space: bool,

    /// Maximum number of data rows shown per table
    #[arg(short, long, default_value_t = 20)]
    limit: usize,

    /// Only list the table names
    #[arg(long)]
    list: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!("delimiter must be a single ASCII character: {:?}", s)),
        },
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    tablesift::logging::init(&cli.log_level);

    let mut config = Config::new()
        .with_sample_size(cli.sample_size)
        .with_strict(cli.strict)
        .with_skip_initial_space(cli.skip_initial_space);
    if let Some(delimiter) = cli.delimiter {
        config = config.with_delimiter(delimiter);
    }
    if let Some(encoding) = cli.encoding {
        config = config.with_encoding(encoding);
    }
    if let Some(table) = cli.table {
        config = config.with_table_name(table);
    }

    let factory = ReaderFactory::new();
    let mut table_set = factory
        .open(&cli.file, &config)
        .with_context(|| format!("Failed to open {}", cli.file.display()))?;

    if cli.list {
        for name in table_set.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut previews = Vec::with_capacity(table_set.len());
    for row_set in table_set.tables_mut() {
        let name = row_set.name().to_string();
        let table_preview = preview(row_set, &config, cli.limit)
            .with_context(|| format!("Failed to read table {}", name))?;
        previews.push(table_preview);
    }

    render_to_stdout(&previews, cli.format.into())
}
