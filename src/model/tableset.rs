//! The collection of logical tables found in one source

use crate::error::{Error, Result};

use super::rowset::RowSet;

/// All row sets surfaced from one opened source, in source order
#[derive(Debug)]
pub struct TableSet {
    name: String,
    tables: Vec<RowSet>,
}

impl TableSet {
    pub fn new(name: impl Into<String>, tables: Vec<RowSet>) -> Self {
        Self {
            name: name.into(),
            tables,
        }
    }

    /// Name of the source the tables came from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tables(&self) -> &[RowSet] {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut [RowSet] {
        &mut self.tables
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&RowSet> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Look up a table by name for registering processors
    pub fn table_mut(&mut self, name: &str) -> Option<&mut RowSet> {
        self.tables.iter_mut().find(|t| t.name() == name)
    }

    /// Table names in source order
    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(RowSet::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn into_tables(self) -> Vec<RowSet> {
        self.tables
    }

    /// Keep only the named table
    pub fn select(mut self, name: &str) -> Result<Self> {
        let position = self
            .tables
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        let table = self.tables.swap_remove(position);
        self.tables = vec![table];
        Ok(self)
    }
}
