//! Data model for lazily read tables

mod cell;
mod rowset;
mod tableset;
mod types;
mod value;

pub use cell::{Cell, Row};
pub use rowset::{RawRow, RawRows, RowSet, RowSource, Rows};
pub use tableset::TableSet;
pub use types::{parse_date, CellType, DEFAULT_DATE_FORMATS};
pub use value::Value;
