//! Row processors registered on a row set

use crate::model::{Cell, CellType, Row, Value};

/// A stage of the row pipeline.
///
/// `position` counts the rows that reached this stage earlier in the same
/// pull, starting at zero. Returning `None` drops the row.
pub trait Processor {
    fn process(&self, position: usize, row: Row) -> Option<Row>;
}

impl<F> Processor for F
where
    F: Fn(usize, Row) -> Option<Row>,
{
    fn process(&self, position: usize, row: Row) -> Option<Row> {
        self(position, row)
    }
}

/// Drops the first `skip` rows of every pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetProcessor {
    skip: usize,
}

impl Processor for OffsetProcessor {
    fn process(&self, position: usize, row: Row) -> Option<Row> {
        if position < self.skip {
            None
        } else {
            Some(row)
        }
    }
}

/// Attaches a column label to each cell by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersProcessor {
    labels: Vec<String>,
}

impl Processor for HeadersProcessor {
    fn process(&self, _position: usize, row: Row) -> Option<Row> {
        Some(row.map_cells(|i, cell| match self.labels.get(i) {
            Some(label) => cell.with_column(label.clone()),
            None => cell,
        }))
    }
}

/// Coerces each cell to the type of its column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypesProcessor {
    types: Vec<CellType>,
}

impl Processor for TypesProcessor {
    fn process(&self, _position: usize, row: Row) -> Option<Row> {
        Some(row.map_cells(|i, cell| match self.types.get(i) {
            Some(cell_type) => apply_coercion(cell, cell_type),
            None => cell,
        }))
    }
}

/// Outcome of coercing one raw value
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Coercion {
    Coerced(Value, CellType),
    /// The value does not conform; it stays text
    Fallback(Value),
}

pub(crate) fn coerce(raw: &Value, cell_type: &CellType) -> Coercion {
    match cell_type.parse(raw) {
        Some(value) => Coercion::Coerced(value, cell_type.clone()),
        None => Coercion::Fallback(
            CellType::String
                .parse(raw)
                .unwrap_or_else(|| Value::String(raw.display().into_owned())),
        ),
    }
}

fn apply_coercion(cell: Cell, cell_type: &CellType) -> Cell {
    match coerce(cell.raw(), cell_type) {
        Coercion::Coerced(value, cell_type) => cell.with_type(cell_type, value),
        Coercion::Fallback(value) => cell.with_type(CellType::String, value),
    }
}

/// Processor dropping the first `skip` rows of every pull
pub fn offset_processor(skip: usize) -> OffsetProcessor {
    OffsetProcessor { skip }
}

/// Processor labelling cells with `labels[i]`
pub fn headers_processor<I, S>(labels: I) -> HeadersProcessor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    HeadersProcessor {
        labels: labels.into_iter().map(Into::into).collect(),
    }
}

/// Processor coercing cells to `types[i]`
pub fn types_processor(types: Vec<CellType>) -> TypesProcessor {
    TypesProcessor { types }
}
