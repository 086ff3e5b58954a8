//! Cell and Row data structures

use std::ops::Index;

use super::types::CellType;
use super::value::Value;

/// One cell of a logical table.
///
/// `raw` is what the collaborator produced and never changes; `value`,
/// `cell_type`, `column` and `empty` reflect the processors a row went
/// through. Cells are rebuilt on every pull.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    raw: Value,
    value: Value,
    cell_type: CellType,
    column: Option<String>,
    position: (usize, usize),
    empty: bool,
}

impl Cell {
    /// Create a fresh cell at `(row, column)` from a raw value
    pub fn new(raw: impl Into<Value>, row: usize, column: usize) -> Self {
        let raw = raw.into();
        let cell_type = CellType::of_native(&raw);
        let value = cell_type.parse(&raw).unwrap_or_else(|| raw.clone());
        let empty = cell_type.is_blank_value(&value);
        Self {
            raw,
            value,
            cell_type,
            column: None,
            position: (row, column),
            empty,
        }
    }

    /// The literal value the collaborator produced
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The current, possibly coerced value
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn cell_type(&self) -> &CellType {
        &self.cell_type
    }

    /// Column label, once a headers processor has run
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Zero-based `(row, column)` within the logical table
    pub fn position(&self) -> (usize, usize) {
        self.position
    }

    /// Blank under the rule of the current type
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Copy of this cell carrying a column label
    pub fn with_column(mut self, label: impl Into<String>) -> Self {
        self.column = Some(label.into());
        self
    }

    /// Copy of this cell holding `value` typed as `cell_type`
    pub fn with_type(mut self, cell_type: CellType, value: Value) -> Self {
        self.empty = cell_type.is_blank_value(&value);
        self.cell_type = cell_type;
        self.value = value;
        self
    }
}

/// A row of cells in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Zero-based index of the row within its table
    index: usize,
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    /// Build a row of fresh cells from raw values
    pub fn from_values(index: usize, values: Vec<Value>) -> Self {
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(column, raw)| Cell::new(raw, index, column))
            .collect();
        Self { index, cells }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell by column index
    pub fn get(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Rebuild the row by transforming every cell with its column index
    pub fn map_cells<F>(self, mut f: F) -> Self
    where
        F: FnMut(usize, Cell) -> Cell,
    {
        let cells = self
            .cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| f(i, cell))
            .collect();
        Self {
            index: self.index,
            cells,
        }
    }

    /// Current values in column order
    pub fn values(&self) -> Vec<&Value> {
        self.cells.iter().map(Cell::value).collect()
    }
}

impl Index<usize> for Row {
    type Output = Cell;

    fn index(&self, column: usize) -> &Cell {
        &self.cells[column]
    }
}

impl IntoIterator for Row {
    type Item = Cell;
    type IntoIter = std::vec::IntoIter<Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
