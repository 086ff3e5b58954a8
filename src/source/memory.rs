//! In-memory row source

use crate::error::{Error, Result};
use crate::model::{RawRow, RawRows, RowSource, Value};

/// Rows already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// Build a source of text cells
    pub fn from_text<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| Value::String(s.into())).collect())
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSource for MemorySource {
    fn rows(&self) -> Result<RawRows<'_>> {
        Ok(Box::new(self.rows.iter().cloned().map(Ok::<RawRow, Error>)))
    }
}
