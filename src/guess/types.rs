//! Column type guessing

use tracing::debug;

use crate::model::{CellType, Row, Value, DEFAULT_DATE_FORMATS};

/// Tunables for the type guesser
#[derive(Debug, Clone, PartialEq)]
pub struct TypeGuessConfig {
    /// Non-conforming values always tolerated in non-strict mode
    pub max_outliers: usize,
    /// Share of non-blank values that may fail in non-strict mode
    pub outlier_ratio: f64,
    /// chrono formats tried for date columns, in order
    pub date_formats: Vec<String>,
}

impl Default for TypeGuessConfig {
    fn default() -> Self {
        Self {
            max_outliers: 1,
            outlier_ratio: 0.1,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl TypeGuessConfig {
    /// Non-conforming values allowed among `sampled` non-blank values
    pub fn allowed_outliers(&self, sampled: usize, strict: bool) -> usize {
        if strict {
            0
        } else {
            let by_ratio = (self.outlier_ratio * sampled as f64).floor() as usize;
            by_ratio.max(self.max_outliers)
        }
    }
}

/// Guess one type per column with default tunables.
///
/// The sample is taken as is, header row included; callers that want the
/// header ignored must skip it first.
pub fn type_guess(rows: &[Row], strict: bool) -> Vec<CellType> {
    type_guess_with(rows, strict, &TypeGuessConfig::default())
}

/// Guess one type per column
pub fn type_guess_with(rows: &[Row], strict: bool, config: &TypeGuessConfig) -> Vec<CellType> {
    let width = rows.iter().map(Row::len).max().unwrap_or(0);
    let candidates = CellType::candidates(&config.date_formats);

    (0..width)
        .map(|col| {
            let values: Vec<&Value> = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.raw())
                .filter(|raw| !raw.is_blank())
                .collect();
            let guessed = guess_column(&values, &candidates, strict, config);
            debug!(column = col, sampled = values.len(), guessed = %guessed, "guessed column type");
            guessed
        })
        .collect()
}

/// Most specific candidate the non-blank values conform to
fn guess_column(
    values: &[&Value],
    candidates: &[CellType],
    strict: bool,
    config: &TypeGuessConfig,
) -> CellType {
    if values.is_empty() {
        return CellType::String;
    }
    let allowed = config.allowed_outliers(values.len(), strict);

    for candidate in candidates {
        if *candidate == CellType::String {
            break;
        }
        let mut failures = 0usize;
        for value in values {
            if !candidate.testable(value) {
                failures += 1;
                if failures > allowed {
                    break;
                }
            }
        }
        let conforming = values.len() - failures.min(values.len());
        if failures <= allowed && conforming > 0 && conforming >= failures {
            return candidate.clone();
        }
    }
    CellType::String
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(data: &[&[&str]]) -> Vec<Row> {
        data.iter()
            .enumerate()
            .map(|(i, r)| Row::from_values(i, r.iter().map(|v| Value::from(*v)).collect()))
            .collect()
    }

    #[test]
    fn test_empty_sample() {
        assert!(type_guess(&[], false).is_empty());
        assert_eq!(type_guess(&rows(&[&["", ""]]), true), vec![CellType::String; 2]);
    }

    #[test]
    fn test_tolerates_header_row() {
        let sample = rows(&[
            &["date", "temperature", "place"],
            &["2011-01-01", "1", "Galway"],
            &["2011-01-02", "-1", "Galway"],
            &["2011-01-03", "0", "Galway"],
            &["2011-01-01", "6", "Berkeley"],
            &["2011-01-02", "8", "Berkeley"],
            &["2011-01-03", "5", "Berkeley"],
        ]);
        assert_eq!(
            type_guess(&sample, false),
            vec![CellType::date("%Y-%m-%d"), CellType::Integer, CellType::String]
        );
    }

    #[test]
    fn test_strict_requires_unanimity() {
        let sample = rows(&[
            &["1", "x", "5", "a"],
            &["2", "y", "0", "b"],
            &["3", "null", "", ""],
            &["4", "z", "2", "c"],
        ]);
        assert_eq!(
            type_guess(&sample, true),
            vec![CellType::Integer, CellType::String, CellType::Integer, CellType::String]
        );

        let mixed = rows(&[&["3"], &["null"], &[""], &[""]]);
        assert_eq!(type_guess(&mixed, true), vec![CellType::String]);
        assert_eq!(type_guess(&mixed, false), vec![CellType::Integer]);
    }

    #[test]
    fn test_float_and_boolean() {
        let sample = rows(&[&["1.5", "yes"], &["2", "no"], &["3.25", "TRUE"]]);
        assert_eq!(type_guess(&sample, true), vec![CellType::Float, CellType::Boolean]);
    }

    #[test]
    fn test_zero_is_not_blank() {
        let sample = rows(&[&["0"], &["0"], &["x"], &["y"]]);
        assert_eq!(type_guess(&sample, false), vec![CellType::String]);
    }

    #[test]
    fn test_native_dates_without_format() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let sample = vec![
            Row::from_values(0, vec![Value::from("date")]),
            Row::from_values(1, vec![Value::from(date)]),
            Row::from_values(2, vec![Value::from(date)]),
        ];
        assert_eq!(type_guess(&sample, false), vec![CellType::Date(None)]);
        assert_eq!(type_guess(&sample[1..], true), vec![CellType::Date(None)]);
    }

    #[test]
    fn test_ragged_rows_widen_columns() {
        let sample = rows(&[&["1"], &["2", "a"]]);
        assert_eq!(type_guess(&sample, true), vec![CellType::Integer, CellType::String]);
    }

    #[test]
    fn test_failures_may_not_outnumber_matches() {
        let config = TypeGuessConfig {
            max_outliers: 3,
            ..TypeGuessConfig::default()
        };
        let minority = rows(&[&["x"], &["y"], &["1"]]);
        assert_eq!(type_guess_with(&minority, false, &config), vec![CellType::String]);

        let tied = rows(&[&["x"], &["1"]]);
        assert_eq!(type_guess_with(&tied, false, &config), vec![CellType::Integer]);
    }

    #[test]
    fn test_outlier_allowance() {
        let config = TypeGuessConfig::default();
        assert_eq!(config.allowed_outliers(5, true), 0);
        assert_eq!(config.allowed_outliers(5, false), 1);
        assert_eq!(config.allowed_outliers(40, false), 4);
    }
}
