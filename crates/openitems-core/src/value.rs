//! Query results: values, rows and named result sets.
//!
//! Result sets carry no declared schema. Columns are looked up by name and a
//! missing column reads as absent, so consumers decide their own defaults.

use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A single cell of a result set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// SQL NULL or an empty cell.
    #[default]
    Null,
    /// Integer value.
    Integer(i64),
    /// Decimal value.
    Number(Decimal),
    /// String value.
    String(String),
}

impl Value {
    /// Infer a typed value from a raw text cell.
    ///
    /// Empty cells become [`Value::Null`]. A cell is typed as a number only
    /// when the number prints back as the exact cell text, so codes such as
    /// `00123` or `+5` stay text and the value always displays as it was read.
    pub fn parse_cell(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::Null;
        }
        if let Ok(n) = raw.parse::<i64>() {
            if n.to_string() == raw {
                return Self::Integer(n);
            }
        }
        if let Ok(d) = Decimal::from_str(raw) {
            if d.to_string() == raw {
                return Self::Number(d);
            }
        }
        Self::String(raw.to_string())
    }

    /// Check if this value is null.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric reading of the value; anything non-numeric reads as zero.
    pub fn as_decimal(&self) -> Decimal {
        match self {
            Self::Integer(n) => Decimal::from(*n),
            Self::Number(d) => *d,
            Self::String(s) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
            Self::Null => Decimal::ZERO,
        }
    }

    /// Integer reading of the value, truncating fractions.
    pub fn as_count(&self) -> i64 {
        match self {
            Self::Integer(n) => *n,
            other => other.as_decimal().trunc().to_i64().unwrap_or(0),
        }
    }

    /// Text used when the value names a group, or `None` for null.
    ///
    /// Surrounding whitespace is ignored, so `" PIX"` and `"PIX"` share a group.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::String(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(d) => write!(f, "{d}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Number(d)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A row of a result set: column name to value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    values: IndexMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value (builder style).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Get a column value; null cells are reported as absent.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column).filter(|v| !v.is_null())
    }

    /// Iterate over `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns present in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The rows returned by one named query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    /// Query name.
    pub name: String,
    /// Column names in query order.
    pub columns: Vec<String>,
    /// Result rows.
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Create an empty result set with the given columns.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a result set from rows, taking columns in first-seen order.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for (column, _) in row.iter() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Append a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result sets keyed by query name, kept in query order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSets {
    sets: IndexMap<String, ResultSet>,
}

impl ResultSets {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result set, replacing any previous one with the same name.
    pub fn insert(&mut self, set: ResultSet) {
        self.sets.insert(set.name.clone(), set);
    }

    /// Add a result set (builder style).
    pub fn with(mut self, set: ResultSet) -> Self {
        self.insert(set);
        self
    }

    /// Look up a result set by query name.
    pub fn get(&self, name: &str) -> Option<&ResultSet> {
        self.sets.get(name)
    }

    /// Iterate over result sets in query order.
    pub fn iter(&self) -> impl Iterator<Item = &ResultSet> {
        self.sets.values()
    }

    /// Number of result sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if there are no result sets.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Total rows across all result sets.
    pub fn total_rows(&self) -> usize {
        self.sets.values().map(ResultSet::len).sum()
    }
}

impl FromIterator<ResultSet> for ResultSets {
    fn from_iter<I: IntoIterator<Item = ResultSet>>(iter: I) -> Self {
        let mut sets = Self::new();
        for set in iter {
            sets.insert(set);
        }
        sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_cell() {
        assert_eq!(Value::parse_cell(""), Value::Null);
        assert_eq!(Value::parse_cell("   "), Value::Null);
        assert_eq!(Value::parse_cell("42"), Value::Integer(42));
        assert_eq!(Value::parse_cell("-7"), Value::Integer(-7));
        assert_eq!(Value::parse_cell("1234.56"), Value::Number(dec!(1234.56)));
        assert_eq!(Value::parse_cell("PIX"), Value::String("PIX".to_string()));
    }

    #[test]
    fn test_parse_cell_keeps_original_text() {
        for raw in ["00123", "+5", " 42", "1e3", "0012.50"] {
            let value = Value::parse_cell(raw);
            assert_eq!(value, Value::String(raw.to_string()), "cell {raw:?}");
            assert_eq!(value.to_string(), raw);
        }
        assert_eq!(Value::parse_cell("1234.50").to_string(), "1234.50");
        assert_eq!(Value::parse_cell(" 42").as_decimal(), dec!(42));
        assert_eq!(Value::parse_cell("00123").as_count(), 123);
    }

    #[test]
    fn test_as_key_ignores_padding() {
        assert_eq!(Value::parse_cell(" PIX ").as_key().as_deref(), Some("PIX"));
        assert_eq!(Value::parse_cell("PIX").as_key().as_deref(), Some("PIX"));
        assert_eq!(Value::parse_cell("00123").as_key().as_deref(), Some("00123"));
        assert_eq!(Value::Null.as_key(), None);
    }

    #[test]
    fn test_as_decimal_coerces_to_zero() {
        assert_eq!(Value::Null.as_decimal(), Decimal::ZERO);
        assert_eq!(Value::from("n/a").as_decimal(), Decimal::ZERO);
        assert_eq!(Value::from("12.5").as_decimal(), dec!(12.5));
        assert_eq!(Value::Integer(3).as_decimal(), dec!(3));
    }

    #[test]
    fn test_as_count() {
        assert_eq!(Value::Integer(5).as_count(), 5);
        assert_eq!(Value::Number(dec!(2.9)).as_count(), 2);
        assert_eq!(Value::from("abc").as_count(), 0);
        assert_eq!(Value::Null.as_count(), 0);
    }

    #[test]
    fn test_row_get_treats_null_as_absent() {
        let row = Row::new().with("A", 1).with("B", Value::Null);
        assert_eq!(row.get("A"), Some(&Value::Integer(1)));
        assert_eq!(row.get("B"), None);
        assert_eq!(row.get("C"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_result_set_from_rows_collects_columns() {
        let set = ResultSet::from_rows(
            "open",
            vec![
                Row::new().with("TYPE", "PIX").with("AMOUNT", 1),
                Row::new().with("TYPE", "PIX").with("EXTRA", 2),
            ],
        );
        assert_eq!(set.columns, ["TYPE", "AMOUNT", "EXTRA"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_result_sets_keep_query_order() {
        let sets: ResultSets = ["b", "a", "c"]
            .into_iter()
            .map(|name| ResultSet::new(name, Vec::new()))
            .collect();
        let names: Vec<_> = sets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert!(sets.get("a").is_some());
        assert!(sets.get("z").is_none());
    }
}
