use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::schema::Field;

/// A single cell of the registry table.
#[derive(Debug, Clone)]
pub enum Value {
    /// Blank, dash or unparseable cell. Distinct from an empty string.
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so equality agrees with `Hash`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Missing => {}
            Value::Text(s) => s.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// One named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub field: Field,
    pub values: Vec<Value>,
}

impl Series {
    pub fn new(field: Field, values: Vec<Value>) -> Self {
        Self { field, values }
    }

    /// True when every present value is a boolean and at least one is present.
    pub fn is_boolean(&self) -> bool {
        let mut present = self.values.iter().filter(|v| !v.is_missing()).peekable();
        present.peek().is_some() && present.all(|v| matches!(v, Value::Bool(_)))
    }

    /// Apply `f` to every cell, returning a new series.
    pub fn map(self, f: impl FnMut(Value) -> Value) -> Self {
        Self {
            field: self.field,
            values: self.values.into_iter().map(f).collect(),
        }
    }
}

/// Ordered collection of equally long series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Series>,
}

impl Table {
    pub fn new(columns: Vec<Series>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].values.len() == w[1].values.len()),
            "series must have equal lengths"
        );
        Self { columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |s| s.values.len())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn fields(&self) -> Vec<Field> {
        self.columns.iter().map(|s| s.field).collect()
    }

    pub fn series(&self, field: Field) -> Option<&Series> {
        self.columns.iter().find(|s| s.field == field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.series(field).is_some()
    }

    /// Replace the series of `field` through `f`; no-op when the column is absent.
    pub fn map_series(mut self, field: Field, f: impl FnOnce(Series) -> Series) -> Self {
        if let Some(pos) = self.columns.iter().position(|s| s.field == field) {
            let series = self.columns.remove(pos);
            self.columns.insert(pos, f(series));
        }
        self
    }

    /// Apply `f` to every series.
    pub fn map_all(self, mut f: impl FnMut(Series) -> Series) -> Self {
        Self {
            columns: self.columns.into_iter().map(&mut f).collect(),
        }
    }

    pub fn push(mut self, series: Series) -> Self {
        self.columns.push(series);
        self
    }

    pub fn drop_column(mut self, field: Field) -> Self {
        self.columns.retain(|s| s.field != field);
        self
    }

    pub fn row(&self, idx: usize) -> Vec<&Value> {
        self.columns.iter().map(|s| &s.values[idx]).collect()
    }

    /// Keep the rows whose flag in `keep` is true.
    pub fn retain_rows(self, keep: &[bool]) -> Self {
        self.map_all(|s| Series {
            field: s.field,
            values: s
                .values
                .into_iter()
                .zip(keep.iter())
                .filter_map(|(v, k)| k.then_some(v))
                .collect(),
        })
    }

    /// Drop exact-duplicate rows, keeping the first occurrence.
    pub fn drop_duplicates(self) -> Self {
        let keep: Vec<bool> = {
            let mut seen = HashSet::with_capacity(self.num_rows());
            (0..self.num_rows())
                .map(|i| seen.insert(self.row(i)))
                .collect()
        };
        self.retain_rows(&keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn drop_duplicates_keeps_first() {
        let table = Table::new(vec![
            Series::new(Field::Name, vec![text("a"), text("b"), text("a")]),
            Series::new(
                Field::Latitude,
                vec![Value::Float(43.6), Value::Float(43.7), Value::Float(43.6)],
            ),
        ]);
        let table = table.drop_duplicates();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.series(Field::Name).unwrap().values, vec![text("a"), text("b")]);
    }

    #[test]
    fn float_equality_matches_hash() {
        use std::collections::hash_map::DefaultHasher;

        let hash = |v: &Value| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        let zero = Value::Float(0.0);
        let neg_zero = Value::Float(-0.0);
        assert_ne!(zero, neg_zero);
        assert_ne!(hash(&zero), hash(&neg_zero));
        assert_eq!(Value::Float(43.6), Value::Float(43.6));
        assert_eq!(hash(&Value::Float(43.6)), hash(&Value::Float(43.6)));
    }

    #[test]
    fn missing_is_not_empty_text() {
        assert_ne!(Value::Missing, text(""));
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn boolean_detection() {
        let s = Series::new(Field::FreeAccess, vec![Value::Bool(true), Value::Missing]);
        assert!(s.is_boolean());
        let s = Series::new(Field::FreeAccess, vec![text("oui"), Value::Bool(true)]);
        assert!(!s.is_boolean());
        let s = Series::new(Field::FreeAccess, vec![Value::Missing]);
        assert!(!s.is_boolean());
    }

    #[test]
    fn map_series_is_noop_for_absent_column() {
        let table = Table::new(vec![Series::new(Field::Name, vec![text("a")])]);
        let out = table.clone().map_series(Field::Phone, |_| unreachable!());
        assert_eq!(out, table);
    }
}
