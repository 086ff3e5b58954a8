//! Guess the structure of a table and read it back typed

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::guess::{headers_guess_with, type_guess_with};
use crate::model::{CellType, Row, RowSet};
use crate::processor::{headers_processor, offset_processor, types_processor};
use crate::schema::Schema;

/// Inferred structure of one table and its first typed rows
#[derive(Debug, Clone)]
pub struct TablePreview {
    pub name: String,
    /// Offset of the header row in the source, if one was found
    pub header_offset: Option<usize>,
    pub labels: Vec<String>,
    pub types: Vec<CellType>,
    pub schema: Schema,
    /// Data rows after the header, labelled and coerced
    pub rows: Vec<Row>,
}

/// Guess headers and types over the sample of `row_set`, register the
/// matching processors and collect up to `limit` data rows.
///
/// Processors already registered on the row set run first; the sample the
/// guessers see has been through them.
pub fn preview(row_set: &mut RowSet, config: &Config, limit: usize) -> Result<TablePreview> {
    let sample = row_set.sample_rows()?;
    let (offset, labels) = headers_guess_with(&sample, &config.headers);

    let header_offset = if labels.is_empty() { None } else { Some(offset) };
    let body = match header_offset {
        Some(offset) => sample.get(offset + 1..).unwrap_or(&[]),
        None => &sample[..],
    };
    let types = type_guess_with(body, config.strict, &config.types);
    debug!(
        table = row_set.name(),
        header_offset = ?header_offset,
        columns = types.len(),
        "inferred table structure"
    );

    if let Some(offset) = header_offset {
        row_set.register_processor(headers_processor(labels.clone()));
        row_set.register_processor(offset_processor(offset + 1));
    }
    row_set.register_processor(types_processor(types.clone()));

    let rows = row_set.full()?.take(limit).collect::<Result<Vec<_>>>()?;
    let schema = Schema::from_parts(&labels, &types);

    Ok(TablePreview {
        name: row_set.name().to_string(),
        header_offset,
        labels,
        types,
        schema,
        rows,
    })
}
