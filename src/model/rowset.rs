//! Lazily iterated logical tables and their processor pipelines

use tracing::trace;

use crate::config::DEFAULT_SAMPLE_SIZE;
use crate::error::Result;
use crate::processor::Processor;

use super::cell::Row;
use super::value::Value;

/// Raw cells of one source row
pub type RawRow = Vec<Value>;

/// Iterator over raw rows of one pull
pub type RawRows<'a> = Box<dyn Iterator<Item = Result<RawRow>> + 'a>;

/// Something that yields the raw rows of one logical table.
///
/// Every call to `rows` starts again from the first row; implementations
/// must not share a cursor between calls.
pub trait RowSource {
    fn rows(&self) -> Result<RawRows<'_>>;
}

/// One logical table: a restartable row stream plus its processors
pub struct RowSet {
    name: String,
    source: Box<dyn RowSource>,
    processors: Vec<Box<dyn Processor>>,
    sample_size: usize,
}

impl std::fmt::Debug for RowSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSet")
            .field("name", &self.name)
            .field("processors", &self.processors.len())
            .field("sample_size", &self.sample_size)
            .finish()
    }
}

impl RowSet {
    /// Create a row set over a source
    pub fn new(name: impl Into<String>, source: impl RowSource + 'static) -> Self {
        Self {
            name: name.into(),
            source: Box::new(source),
            processors: Vec::new(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Set the number of raw rows a sample covers
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Rename the table
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Append a processor; it runs after every processor registered before it
    pub fn register_processor(&mut self, processor: impl Processor + 'static) {
        self.processors.push(Box::new(processor));
    }

    /// Number of registered processors
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Drop all registered processors
    pub fn clear_processors(&mut self) {
        self.processors.clear();
    }

    /// Pull at most `sample_size` source rows through the pipeline
    pub fn sample(&self) -> Result<Rows<'_>> {
        trace!(table = %self.name, limit = self.sample_size, "starting sample pull");
        let raw = self.source.rows()?;
        Ok(Rows::new(Box::new(raw.take(self.sample_size)), &self.processors))
    }

    /// Pull every source row through the pipeline
    pub fn full(&self) -> Result<Rows<'_>> {
        trace!(table = %self.name, "starting full pull");
        let raw = self.source.rows()?;
        Ok(Rows::new(raw, &self.processors))
    }

    /// Collect a sample pull
    pub fn sample_rows(&self) -> Result<Vec<Row>> {
        self.sample()?.collect()
    }

    /// Collect a full pull
    pub fn all_rows(&self) -> Result<Vec<Row>> {
        self.full()?.collect()
    }
}

/// Rows of one pull, each run through the pipeline in registration order
pub struct Rows<'a> {
    raw: RawRows<'a>,
    processors: &'a [Box<dyn Processor>],
    /// Rows that have reached each stage during this pull
    seen: Vec<usize>,
    next_index: usize,
}

impl<'a> Rows<'a> {
    fn new(raw: RawRows<'a>, processors: &'a [Box<dyn Processor>]) -> Self {
        Self {
            raw,
            processors,
            seen: vec![0; processors.len()],
            next_index: 0,
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let values = match self.raw.next()? {
                Ok(values) => values,
                Err(e) => return Some(Err(e)),
            };
            let index = self.next_index;
            self.next_index += 1;

            let mut row = Some(Row::from_values(index, values));
            for (stage, processor) in self.processors.iter().enumerate() {
                row = match row {
                    Some(current) => {
                        let position = self.seen[stage];
                        self.seen[stage] += 1;
                        processor.process(position, current)
                    }
                    None => break,
                };
            }

            if let Some(row) = row {
                return Some(Ok(row));
            }
        }
    }
}
