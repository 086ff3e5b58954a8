//! Boxed terminal tables

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::preview::TablePreview;
use crate::schema::column_label;

use super::OutputFormatter;

/// Terminal table output
pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn render(&self, previews: &[TablePreview], writer: &mut dyn Write) -> Result<()> {
        for preview in previews {
            writeln!(writer, "{}", preview.name)?;
            match preview.header_offset {
                Some(offset) => writeln!(writer, "header row: {}", offset)?,
                None => writeln!(writer, "header row: none")?,
            }

            let width = preview
                .types
                .len()
                .max(preview.labels.len())
                .max(preview.rows.iter().map(|r| r.len()).max().unwrap_or(0));
            if width == 0 {
                writeln!(writer, "(empty)")?;
                writeln!(writer)?;
                continue;
            }

            let mut builder = Builder::default();
            builder.push_record((0..width).map(|i| {
                let ty = preview.types.get(i).map(|t| t.to_string()).unwrap_or_default();
                format!("{}\n{}", column_label(&preview.labels, i), ty)
            }));
            for row in &preview.rows {
                builder.push_record(
                    (0..width).map(|i| row.get(i).map(|c| c.value().to_string()).unwrap_or_default()),
                );
            }

            let mut table = builder.build();
            table.with(Style::modern());
            writeln!(writer, "{}", table)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}
