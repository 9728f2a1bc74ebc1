//! Statement text assembly with positional parameters.

use crate::condition::Conditions;
use crate::value::Value;
use std::fmt::Write;

/// Positional parameter marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `?` (MySQL / SQLite style)
    #[default]
    Question,
    /// `$1, $2, ...` (PostgreSQL style)
    Dollar,
}

impl Placeholder {
    /// Render the marker for the 1-based parameter `index`.
    pub fn render(self, index: usize) -> String {
        let mut out = String::new();
        self.write(&mut out, index);
        out
    }

    fn write(self, out: &mut String, index: usize) {
        match self {
            Placeholder::Question => out.push('?'),
            Placeholder::Dollar => {
                let _ = write!(out, "${index}");
            }
        }
    }
}

/// A statement ready to send: literal SQL plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

/// Incremental SQL writer that numbers placeholders as values are bound.
pub(crate) struct SqlWriter {
    style: Placeholder,
    sql: String,
    params: Vec<Value>,
}

impl SqlWriter {
    pub(crate) fn new(style: Placeholder) -> Self {
        Self {
            style,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a placeholder and bind `value` to it.
    pub(crate) fn push_bind(&mut self, value: Value) -> &mut Self {
        self.params.push(value);
        self.style.write(&mut self.sql, self.params.len());
        self
    }

    /// Append items separated by `sep`, rendering each with `f`.
    pub(crate) fn push_separated<T>(
        &mut self,
        items: impl IntoIterator<Item = T>,
        sep: &str,
        mut f: impl FnMut(&mut Self, T),
    ) -> &mut Self {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            f(self, item);
        }
        self
    }

    /// Append ` WHERE a = ? AND b = ?`, or nothing when `conditions` is empty.
    pub(crate) fn push_where(&mut self, conditions: &Conditions) -> &mut Self {
        if conditions.is_empty() {
            return self;
        }
        self.push(" WHERE ");
        self.push_separated(conditions.iter(), " AND ", |w, (column, value)| {
            w.push(column).push(" = ").push_bind(value.clone());
        })
    }

    pub(crate) fn finish(self) -> BuiltQuery {
        BuiltQuery::new(self.sql, self.params)
    }
}
