//! HTML table reader

use indexmap::IndexSet;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{RawRow, RowSet, TableSet, Value};

use super::encoding::decode;
use super::memory::MemorySource;
use super::TableReader;

/// Upper bound for colspan/rowspan attributes
const MAX_SPAN: usize = 1000;

/// Reader for every `<table>` element of an HTML document
pub struct HtmlReader;

impl TableReader for HtmlReader {
    fn read(&self, name: &str, bytes: Vec<u8>, config: &Config) -> Result<TableSet> {
        let text = decode(&bytes, config.encoding.as_deref())?;
        let document = Html::parse_document(&text);
        let selector =
            Selector::parse("table").map_err(|e| Error::Html(format!("{:?}", e)))?;

        let mut names: IndexSet<String> = IndexSet::new();
        let mut tables = Vec::new();
        for (index, table) in document.select(&selector).enumerate() {
            let grid = expand_spans(&table_rows(table));
            let table_name = unique_name(&mut names, describe(table, index));
            debug!(document = name, table = %table_name, rows = grid.len(), "extracted table");

            let rows: Vec<RawRow> = grid
                .into_iter()
                .map(|row| row.into_iter().map(Value::String).collect())
                .collect();
            tables.push(
                RowSet::new(table_name, MemorySource::new(rows))
                    .with_sample_size(config.sample_size),
            );
        }

        Ok(TableSet::new(name, tables))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "html" | "htm" | "xhtml")
    }
}

/// A cell before span expansion
struct SpanCell {
    text: String,
    colspan: usize,
    rowspan: usize,
}

/// Stable table name: its attributes as a JSON object, or its position.
///
/// Keys are sorted and separated as `{"id": "t", "style": "x"}`, with a
/// space after each colon and comma.
fn describe(table: ElementRef<'_>, index: usize) -> String {
    let mut attrs: Vec<(&str, &str)> = table.value().attrs().collect();
    if attrs.is_empty() {
        return format!("table_{}", index);
    }
    attrs.sort_unstable();
    let members: Vec<String> = attrs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}: {}",
                serde_json::Value::from(k),
                serde_json::Value::from(v)
            )
        })
        .collect();
    format!("{{{}}}", members.join(", "))
}

fn unique_name(names: &mut IndexSet<String>, name: String) -> String {
    let mut candidate = name.clone();
    let mut n = 2;
    while names.contains(&candidate) {
        candidate = format!("{}#{}", name, n);
        n += 1;
    }
    names.insert(candidate.clone());
    candidate
}

/// Rows of a table in head, body, foot order; nested tables excluded
fn table_rows(table: ElementRef<'_>) -> Vec<Vec<SpanCell>> {
    let mut head = Vec::new();
    let mut body = Vec::new();
    let mut foot = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => body.push(child),
            "thead" => head.extend(child_elements(child, "tr")),
            "tbody" => body.extend(child_elements(child, "tr")),
            "tfoot" => foot.extend(child_elements(child, "tr")),
            _ => {}
        }
    }

    head.into_iter()
        .chain(body)
        .chain(foot)
        .map(|tr| {
            tr.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(|cell| SpanCell {
                    text: cell_text(cell),
                    colspan: span(cell, "colspan"),
                    rowspan: span(cell, "rowspan"),
                })
                .collect()
        })
        .collect()
}

fn child_elements<'a>(parent: ElementRef<'a>, name: &'static str) -> Vec<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == name)
        .collect()
}

fn span(cell: ElementRef<'_>, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

/// Text of a cell, skipping any tables nested inside it
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut text = String::new();
    collect_text(cell, &mut text);
    text
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(t) = child.value().as_text() {
            out.push_str(t);
        } else if let Some(e) = ElementRef::wrap(child) {
            if e.value().name() != "table" {
                collect_text(e, out);
            }
        }
    }
}

/// Lay spanned cells out on a rectangular grid.
///
/// Spanned slots repeat the cell text; slots no cell covers are empty.
fn expand_spans(rows: &[Vec<SpanCell>]) -> Vec<Vec<String>> {
    // Per column: rows still covered by a rowspan, and the text to repeat
    let mut carried: Vec<Option<(usize, String)>> = Vec::new();
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len());

    for cells in rows {
        let mut out: Vec<String> = Vec::new();
        let mut cells = cells.iter();
        let mut col = 0usize;

        loop {
            if let Some(slot) = carried.get_mut(col) {
                if let Some((remaining, text)) = slot.take() {
                    out.push(text.clone());
                    if remaining > 1 {
                        *slot = Some((remaining - 1, text));
                    }
                    col += 1;
                    continue;
                }
            }

            match cells.next() {
                Some(cell) => {
                    for _ in 0..cell.colspan {
                        if carried.len() <= col {
                            carried.resize(col + 1, None);
                        }
                        // A cell placed over a carried slot ends that rowspan
                        carried[col] =
                            (cell.rowspan > 1).then(|| (cell.rowspan - 1, cell.text.clone()));
                        out.push(cell.text.clone());
                        col += 1;
                    }
                }
                None => {
                    if carried[col.min(carried.len())..].iter().any(Option::is_some) {
                        out.push(String::new());
                        col += 1;
                    } else {
                        break;
                    }
                }
            }
        }
        grid.push(out);
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut grid {
        row.resize(width, String::new());
    }
    grid
}
