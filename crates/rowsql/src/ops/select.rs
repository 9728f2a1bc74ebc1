use super::writer::{BuiltQuery, Placeholder, SqlWriter};
use super::{Executor, Operation, Outcome};
use crate::client::Handle;
use crate::condition::Conditions;
use crate::row::Row;

/// Build `SELECT <columns> FROM <table> [WHERE c1 = ? AND c2 = ? ...]`.
///
/// Column names are written verbatim; an empty list selects `*`.
pub fn build_select<C: AsRef<str>>(
    table: &str,
    columns: &[C],
    conditions: &Conditions,
    style: Placeholder,
) -> BuiltQuery {
    let mut w = SqlWriter::new(style);
    w.push("SELECT ");
    if columns.is_empty() {
        w.push("*");
    } else {
        w.push_separated(columns, ", ", |w, column| {
            w.push(AsRef::<str>::as_ref(column));
        });
    }
    w.push(" FROM ").push(table).push_where(conditions);
    w.finish()
}

impl<H: Handle> Executor<'_, H> {
    /// Select `columns` from `table`, filtered by `conditions`.
    ///
    /// Every returned row is decoded into a [`Row`], in the order the database
    /// returned them.
    pub async fn select<C: AsRef<str>>(
        &self,
        table: &str,
        columns: &[C],
        conditions: &Conditions,
    ) -> Outcome<Vec<Row>> {
        let query = build_select(table, columns, conditions, self.placeholder());
        self.log_statement(Operation::Select, table, &query);
        let result = self.handle.query(&query.sql, &query.params).await;
        self.finish(Operation::Select, table, query.sql, result)
    }
}
