//! Column schema descriptions for downstream consumers

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::guess::{headers_guess, type_guess};
use crate::model::{CellType, RowSet};

/// One column of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Ordered column descriptions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    /// Pair labels with types by position.
    ///
    /// Missing or blank labels become `column_<n>` (one-based); repeated
    /// labels get unique ids (`total`, `total_2`); columns without a type
    /// are strings.
    pub fn from_parts(labels: &[String], types: &[CellType]) -> Self {
        let width = labels.len().max(types.len());
        let fields = column_ids(labels, width)
            .into_iter()
            .enumerate()
            .map(|(i, id)| Field {
                id,
                label: column_label(labels, i),
                field_type: types.get(i).unwrap_or(&CellType::String).name().to_string(),
            })
            .collect();
        Self { fields }
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Display label of column `i`: trimmed, or `column_<n>` when blank
pub fn column_label(labels: &[String], i: usize) -> String {
    labels
        .get(i)
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("column_{}", i + 1))
}

/// Unique keys for `width` columns.
///
/// Each key is the column label; a label already taken gets the first free
/// `_<n>` suffix, starting at 2.
pub fn column_ids(labels: &[String], width: usize) -> Vec<String> {
    let mut taken: FxHashSet<String> = FxHashSet::default();
    (0..width)
        .map(|i| {
            let base = column_label(labels, i);
            let mut id = base.clone();
            let mut n = 2;
            while taken.contains(&id) {
                id = format!("{}_{}", base, n);
                n += 1;
            }
            taken.insert(id.clone());
            id
        })
        .collect()
}

/// Describe a row set by guessing headers and types over its sample
pub fn rowset_as_schema(row_set: &RowSet, strict: bool) -> Result<Schema> {
    let sample = row_set.sample_rows()?;
    let (_, labels) = headers_guess(&sample);
    let types = type_guess(&sample, strict);
    Ok(Schema::from_parts(&labels, &types))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::source::MemorySource;

    #[test]
    fn test_rowset_as_schema() {
        let rows = vec![
            vec![Value::from("name"), Value::from("dob")],
            vec![Value::from("mk"), Value::from("2012-01-02")],
        ];
        let row_set = RowSet::new("people", MemorySource::new(rows));
        let schema = rowset_as_schema(&row_set, false).unwrap();

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            json["fields"],
            serde_json::json!([
                {"id": "name", "label": "name", "type": "string"},
                {"id": "dob", "label": "dob", "type": "date"},
            ])
        );
    }

    #[test]
    fn test_repeated_labels_get_unique_ids() {
        let labels: Vec<String> = ["region", "total", "total", "", "total_2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            column_ids(&labels, 6),
            vec!["region", "total", "total_2", "column_4", "total_2_2", "column_6"]
        );

        let schema = Schema::from_parts(&labels[..3], &[]);
        let ids: Vec<&str> = schema.fields.iter().map(|f| f.id.as_str()).collect();
        let shown: Vec<&str> = schema.fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(ids, vec!["region", "total", "total_2"]);
        assert_eq!(shown, vec!["region", "total", "total"]);
    }

    #[test]
    fn test_from_parts_fills_gaps() {
        let schema = Schema::from_parts(
            &[" a ".to_string(), "".to_string()],
            &[CellType::Integer, CellType::Float, CellType::Boolean],
        );
        let ids: Vec<&str> = schema.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "column_2", "column_3"]);
        let types: Vec<&str> = schema.fields.iter().map(|f| f.field_type.as_str()).collect();
        assert_eq!(types, vec!["integer", "float", "boolean"]);
    }
}
