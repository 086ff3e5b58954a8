//! Output formatting for table previews

mod json;
mod table;

use std::io::Write;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::preview::TablePreview;

pub use json::{JsonOutput, SchemaOutput};
pub use table::TableOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render previews to a writer
    fn render(&self, previews: &[TablePreview], writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Table => Box::new(TableOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::Schema => Box::new(SchemaOutput::new()),
        }
    }
}

/// Render previews to stdout
pub fn render_to_stdout(previews: &[TablePreview], format: OutputFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let mut stdout = std::io::stdout().lock();
    formatter.render(previews, &mut stdout)
}
