//! Spreadsheet reader (xlsx, xls, ods)

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::model::{RawRow, RawRows, RowSet, RowSource, TableSet, Value};

use super::TableReader;

/// Reader for spreadsheet workbooks; one table per sheet
pub struct ExcelReader;

impl TableReader for ExcelReader {
    fn read(&self, name: &str, bytes: Vec<u8>, config: &Config) -> Result<TableSet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let sheet_names = workbook.sheet_names().to_owned();

        let mut tables = Vec::with_capacity(sheet_names.len());
        for sheet in sheet_names {
            // A broken sheet surfaces as an empty table; the others still load
            let range: Range<Data> = match workbook.worksheet_range(&sheet) {
                Ok(range) => range,
                Err(e) => {
                    warn!(workbook = name, sheet = %sheet, error = %e, "unreadable sheet");
                    Range::empty()
                }
            };
            let (rows, cols) = range.get_size();
            debug!(workbook = name, sheet = %sheet, rows, cols, "loaded sheet");
            tables.push(
                RowSet::new(sheet, SheetSource::new(range)).with_sample_size(config.sample_size),
            );
        }

        Ok(TableSet::new(name, tables))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm" | "xlsb")
    }
}

/// Cells of one sheet, positioned as in the sheet
pub struct SheetSource {
    range: Range<Data>,
}

impl SheetSource {
    pub fn new(range: Range<Data>) -> Self {
        Self { range }
    }
}

impl RowSource for SheetSource {
    fn rows(&self) -> Result<RawRows<'_>> {
        // Ranges start at the first used cell; pad back to A1
        let (top, left) = self.range.start().unwrap_or((0, 0));
        let (top, left) = (top as usize, left as usize);

        let leading = (0..top).map(|_| -> Result<RawRow> { Ok(RawRow::new()) });
        let body = self.range.rows().map(move |row| -> Result<RawRow> {
            let mut values: RawRow = vec![Value::Empty; left];
            values.extend(row.iter().map(convert_cell));
            Ok(values)
        });
        Ok(Box::new(leading.chain(body)))
    }
}

fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) => Value::String(s.clone()),
        Data::Float(f) => Value::Float(*f),
        Data::Int(i) => Value::Int(*i),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(datetime) => Value::Date(datetime),
            None => Value::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .map(Value::Date)
            .unwrap_or_else(|| Value::String(s.clone())),
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(format!("#{:?}", e)),
    }
}

/// Spreadsheet serial dates count days from 1899-12-30
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Bad" sheetId="1" r:id="rId1"/><sheet name="Good" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#;

    const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

    const TRUNCATED_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1"><v>1</v>"#;

    const GOOD_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>name</t></is></c></row><row r="2"><c r="A2"><v>7</v></c></row></sheetData></worksheet>"#;

    fn workbook(first_sheet: &str) -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (path, contents) in [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", PACKAGE_RELS),
            ("xl/workbook.xml", WORKBOOK_XML),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", first_sheet),
            ("xl/worksheets/sheet2.xml", GOOD_SHEET),
        ] {
            writer.start_file(path, SimpleFileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_unreadable_sheet_becomes_empty_table() {
        let tables = ExcelReader
            .read("book.xlsx", workbook(TRUNCATED_SHEET), &Config::default())
            .unwrap();

        assert_eq!(tables.names(), vec!["Bad", "Good"]);
        assert!(tables.tables()[0].all_rows().unwrap().is_empty());
        let good = tables.tables()[1].all_rows().unwrap();
        assert_eq!(good.len(), 2);
        assert_eq!(good[1][0].value(), &Value::Float(7.0));
    }

    #[test]
    fn test_unreadable_workbook_is_an_error() {
        let result = ExcelReader.read("book.xlsx", b"not a workbook".to_vec(), &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_serial_dates() {
        let expected = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap().and_hms_opt(0, 0, 0);
        assert_eq!(excel_serial_to_datetime(40544.0), expected);

        let noon = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap().and_hms_opt(12, 0, 0);
        assert_eq!(excel_serial_to_datetime(40544.5), noon);
        assert_eq!(excel_serial_to_datetime(f64::NAN), None);
    }

    #[test]
    fn test_convert_native_cells() {
        assert_eq!(convert_cell(&Data::Empty), Value::Empty);
        assert_eq!(convert_cell(&Data::Float(1.5)), Value::Float(1.5));
        assert_eq!(convert_cell(&Data::Bool(true)), Value::Bool(true));
        assert_eq!(
            convert_cell(&Data::String("place".into())),
            Value::from("place")
        );
        assert!(matches!(
            convert_cell(&Data::DateTimeIso("2011-01-01".into())),
            Value::Date(_)
        ));
    }

    #[test]
    fn test_empty_sheet_yields_no_rows() {
        let source = SheetSource::new(Range::empty());
        assert_eq!(source.rows().unwrap().count(), 0);
    }

    #[test]
    fn test_sheet_rows_are_padded_to_origin() {
        let mut range: Range<Data> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("a".into()));
        range.set_value((2, 2), Data::Float(2.0));

        let source = SheetSource::new(range);
        let rows: Vec<RawRow> = source.rows().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty());
        assert_eq!(rows[1], vec![Value::Empty, Value::from("a"), Value::Empty]);
        assert_eq!(rows[2][2], Value::Float(2.0));
    }
}
