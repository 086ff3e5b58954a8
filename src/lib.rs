//! tablesift - Structure inference for messy tabular data
//!
//! Opens CSV, spreadsheet, HTML and ZIP sources as lazily read tables,
//! guesses which row holds the headers and what type each column has,
//! and reads rows back labelled and typed through a processor pipeline.

pub mod config;
pub mod error;
pub mod guess;
pub mod logging;
pub mod model;
pub mod output;
pub mod preview;
pub mod processor;
pub mod schema;
pub mod source;

pub use config::Config;
pub use error::{Error, Result};
pub use guess::{headers_guess, type_guess};
pub use model::{Cell, CellType, Row, RowSet, RowSource, TableSet, Value};
pub use preview::{preview, TablePreview};
pub use processor::{headers_processor, offset_processor, types_processor, Processor};
pub use schema::{rowset_as_schema, Field, Schema};
pub use source::{detect_format, MemorySource, ReaderFactory, TableReader};
