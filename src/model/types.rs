//! The closed set of column types and their parse rules

use chrono::{NaiveDate, NaiveDateTime};

use super::value::Value;

/// Date formats tried, in order, when guessing a date column.
///
/// Every format carries separators so that plain integers never read as
/// dates.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// A member of the type lattice.
///
/// Specificity, most specific first: Date, Integer, Float, Boolean, String.
/// Two `Date` types are equal only when their formats match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellType {
    String,
    Integer,
    Float,
    Boolean,
    /// `None` matches only native dates, never free text
    Date(Option<String>),
}

impl Default for CellType {
    fn default() -> Self {
        CellType::String
    }
}

impl CellType {
    /// Date type with a concrete format
    pub fn date(format: impl Into<String>) -> Self {
        CellType::Date(Some(format.into()))
    }

    /// Type of a freshly produced cell: native scalars keep their kind
    pub fn of_native(raw: &Value) -> Self {
        match raw {
            Value::Int(_) => CellType::Integer,
            Value::Float(_) => CellType::Float,
            Value::Bool(_) => CellType::Boolean,
            Value::Date(_) => CellType::Date(None),
            Value::String(_) | Value::Empty => CellType::String,
        }
    }

    /// Lowercase type name used in schema descriptions
    pub fn name(&self) -> &'static str {
        match self {
            CellType::String => "string",
            CellType::Integer => "integer",
            CellType::Float => "float",
            CellType::Boolean => "boolean",
            CellType::Date(_) => "date",
        }
    }

    /// Rank in the lattice; higher is more specific
    pub fn specificity(&self) -> u8 {
        match self {
            CellType::Date(_) => 4,
            CellType::Integer => 3,
            CellType::Float => 2,
            CellType::Boolean => 1,
            CellType::String => 0,
        }
    }

    /// All candidates in the order the type guesser walks them
    pub fn candidates<S: AsRef<str>>(date_formats: &[S]) -> Vec<CellType> {
        let mut candidates = Vec::with_capacity(date_formats.len() + 5);
        candidates.push(CellType::Date(None));
        candidates.extend(date_formats.iter().map(|f| CellType::date(f.as_ref())));
        candidates.extend([
            CellType::Integer,
            CellType::Float,
            CellType::Boolean,
            CellType::String,
        ]);
        candidates
    }

    /// Does the raw value parse as this type? Blank values always do.
    pub fn testable(&self, raw: &Value) -> bool {
        raw.is_blank() || self.parse(raw).is_some()
    }

    /// Parse a raw value into this type.
    ///
    /// Blank input yields the type's blank value; `None` means the value does
    /// not conform.
    pub fn parse(&self, raw: &Value) -> Option<Value> {
        if raw.is_blank() {
            return Some(self.blank_value());
        }
        match self {
            CellType::String => Some(Value::String(raw.display().into_owned())),
            CellType::Integer => match raw {
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::Int),
                other => other.as_i64().map(Value::Int),
            },
            CellType::Float => match raw {
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Value::Float),
                other => other.as_f64().map(Value::Float),
            },
            CellType::Boolean => match raw {
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::String(s) => parse_bool(s.trim()).map(Value::Bool),
                _ => None,
            },
            CellType::Date(format) => match (raw, format) {
                (Value::Date(dt), _) => Some(Value::Date(*dt)),
                (Value::String(s), Some(format)) => parse_date(s.trim(), format).map(Value::Date),
                _ => None,
            },
        }
    }

    /// The value a blank cell of this type holds
    pub fn blank_value(&self) -> Value {
        match self {
            CellType::String => Value::String(String::new()),
            _ => Value::Empty,
        }
    }

    /// Blankness rule for an already coerced value of this type
    pub fn is_blank_value(&self, value: &Value) -> bool {
        match self {
            CellType::String => value.is_blank(),
            _ => value.is_empty_marker(),
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::Date(Some(format)) => write!(f, "date({})", format),
            other => write!(f, "{}", other.name()),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("no") {
        Some(false)
    } else {
        None
    }
}

/// Parse text with a chrono format, accepting date-only formats
pub fn parse_date(s: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, format).ok().or_else(|| {
        NaiveDate::parse_from_str(s, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

impl serde::Serialize for CellType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parse() {
        assert_eq!(CellType::Integer.parse(&"42".into()), Some(Value::Int(42)));
        assert_eq!(CellType::Integer.parse(&" 7 ".into()), Some(Value::Int(7)));
        assert_eq!(CellType::Integer.parse(&Value::Float(5.0)), Some(Value::Int(5)));
        assert_eq!(CellType::Integer.parse(&"3.5".into()), None);
        assert_eq!(CellType::Integer.parse(&"null".into()), None);
        assert_eq!(CellType::Integer.parse(&"".into()), Some(Value::Empty));
    }

    #[test]
    fn test_float_rejects_non_finite_words() {
        assert_eq!(CellType::Float.parse(&"2.5".into()), Some(Value::Float(2.5)));
        assert_eq!(CellType::Float.parse(&"NaN".into()), None);
        assert_eq!(CellType::Float.parse(&"inf".into()), None);
    }

    #[test]
    fn test_date_needs_format_for_text() {
        let raw = Value::from("2011-01-01");
        assert!(!CellType::Date(None).testable(&raw));
        assert!(CellType::date("%Y-%m-%d").testable(&raw));
        assert!(!CellType::date("%d/%m/%Y").testable(&raw));

        let native = Value::from(NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert!(CellType::Date(None).testable(&native));
    }

    #[test]
    fn test_integers_are_not_dates() {
        for format in DEFAULT_DATE_FORMATS {
            assert!(!CellType::date(*format).testable(&"2011".into()), "{}", format);
            assert!(!CellType::date(*format).testable(&"20110101".into()), "{}", format);
        }
    }

    #[test]
    fn test_equality_includes_date_format() {
        assert_eq!(CellType::date("%Y-%m-%d"), CellType::date("%Y-%m-%d"));
        assert_ne!(CellType::date("%Y-%m-%d"), CellType::Date(None));
        assert_ne!(CellType::Integer, CellType::Float);
    }

    #[test]
    fn test_blank_is_always_testable() {
        for ty in CellType::candidates(DEFAULT_DATE_FORMATS) {
            assert!(ty.testable(&Value::Empty));
            assert!(ty.testable(&"".into()));
        }
    }

    #[test]
    fn test_parse_is_noop_on_own_type() {
        let parsed = CellType::date("%Y-%m-%d").parse(&"2011-01-01".into()).unwrap();
        assert_eq!(CellType::date("%Y-%m-%d").parse(&parsed), Some(parsed.clone()));
        assert_eq!(CellType::Integer.parse(&Value::Int(3)), Some(Value::Int(3)));
        assert_eq!(CellType::String.parse(&"x".into()), Some(Value::from("x")));
    }

    #[test]
    fn test_candidate_order() {
        let candidates = CellType::candidates(&["%Y-%m-%d"]);
        assert_eq!(candidates.first(), Some(&CellType::Date(None)));
        assert_eq!(candidates.last(), Some(&CellType::String));
        let ranks: Vec<u8> = candidates.iter().map(|c| c.specificity()).collect();
        assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
    }
}
