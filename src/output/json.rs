//! JSON output formats

use std::io::Write;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::Value;
use crate::preview::TablePreview;
use crate::schema::{column_ids, Schema};

use super::OutputFormatter;

/// Typed rows as JSON objects keyed by column label
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonTable<'a> {
    name: &'a str,
    header_offset: Option<usize>,
    schema: &'a Schema,
    rows: Vec<IndexMap<String, &'a Value>>,
}

impl OutputFormatter for JsonOutput {
    fn render(&self, previews: &[TablePreview], writer: &mut dyn Write) -> Result<()> {
        let tables: Vec<JsonTable<'_>> = previews
            .iter()
            .map(|preview| {
                let width = preview
                    .rows
                    .iter()
                    .map(|r| r.len())
                    .max()
                    .unwrap_or(0)
                    .max(preview.labels.len());
                let keys = column_ids(&preview.labels, width);
                JsonTable {
                    name: &preview.name,
                    header_offset: preview.header_offset,
                    schema: &preview.schema,
                    rows: preview
                        .rows
                        .iter()
                        .map(|row| {
                            keys.iter()
                                .cloned()
                                .zip(row.iter().map(|cell| cell.value()))
                                .collect()
                        })
                        .collect(),
                }
            })
            .collect();

        write_json(self.pretty, &tables, writer)
    }
}

/// Column schemas only
pub struct SchemaOutput;

impl SchemaOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SchemaOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for SchemaOutput {
    fn render(&self, previews: &[TablePreview], writer: &mut dyn Write) -> Result<()> {
        let schemas: IndexMap<&str, &Schema> = previews
            .iter()
            .map(|p| (p.name.as_str(), &p.schema))
            .collect();
        write_json(true, &schemas, writer)
    }
}

fn write_json<T: Serialize>(pretty: bool, value: &T, writer: &mut dyn Write) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::RowSet;
    use crate::preview::preview;
    use crate::source::MemorySource;

    fn previews() -> Vec<TablePreview> {
        let mut rows = RowSet::new(
            "people",
            MemorySource::from_text(vec![vec!["name", "age"], vec!["ann", "31"], vec!["bob", ""]]),
        );
        vec![preview(&mut rows, &Config::default(), 10).unwrap()]
    }

    #[test]
    fn test_json_rows() {
        let mut out = Vec::new();
        JsonOutput::compact().render(&previews(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json[0]["name"], "people");
        assert_eq!(json[0]["rows"][0]["age"], 31);
        assert_eq!(json[0]["rows"][1]["age"], serde_json::Value::Null);
        assert_eq!(json[0]["schema"]["fields"][1]["type"], "integer");
    }

    #[test]
    fn test_repeated_labels_keep_every_cell() {
        let mut rows = RowSet::new(
            "sales",
            MemorySource::from_text(vec![
                vec!["region", "total", "total"],
                vec!["north", "1", "2"],
                vec!["south", "3", "4"],
            ]),
        );
        let previews = vec![preview(&mut rows, &Config::default(), 10).unwrap()];

        let mut out = Vec::new();
        JsonOutput::compact().render(&previews, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(
            json[0]["rows"][0],
            serde_json::json!({"region": "north", "total": 1, "total_2": 2})
        );
        assert_eq!(json[0]["rows"][1]["total"], 3);
        assert_eq!(json[0]["schema"]["fields"][2]["id"], "total_2");
    }

    #[test]
    fn test_schema_output() {
        let mut out = Vec::new();
        SchemaOutput::new().render(&previews(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["people"]["fields"][0]["id"], "name");
        assert_eq!(json["people"]["fields"][0]["type"], "string");
    }
}
