//! Equality conditions for WHERE clauses.
//!
//! A [`Conditions`] value is an ordered chain of `column = value` tests joined
//! with `AND`. Order is kept exactly as given, so the rendered SQL and its
//! parameter list are deterministic.

use crate::row::Row;
use crate::value::Value;

/// An ordered sequence of `column = value` conditions, ANDed together.
///
/// # Example
/// ```
/// use rowsql::Conditions;
///
/// let filter = Conditions::new().eq("status", "active").eq("tenant_id", 7);
/// assert_eq!(filter.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    pairs: Vec<(String, Value)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`.
    ///
    /// A [`Value::Null`] still renders `column = ?`, which SQL never treats as
    /// true; such a condition matches no rows.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Add `column = value` in place.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.pairs.push((column.into(), value.into()));
    }

    /// Append another chain; every condition is still ANDed.
    pub fn and(mut self, other: Conditions) -> Self {
        self.pairs.extend(other.pairs);
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.pairs.iter().map(|(column, value)| (column.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Conditions {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Conditions {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Match every column of a row (e.g. a natural key).
impl From<Row> for Conditions {
    fn from(row: Row) -> Self {
        row.into_iter().collect()
    }
}
