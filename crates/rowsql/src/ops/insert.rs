use super::writer::{BuiltQuery, Placeholder, SqlWriter};
use super::{Executor, Operation, Outcome};
use crate::client::Handle;
use crate::config::InsertColumns;
use crate::error::{DbError, DbResult};
use crate::row::Row;
use crate::value::Value;

/// Build a multi-row `INSERT INTO <table> (c1, c2) VALUES (?, ?), (?, ?), ...`.
///
/// The column list is taken from the first row. Returns `Ok(None)` when `rows`
/// is empty. Under [`InsertColumns::Strict`] every row must carry the same
/// column set as the first one; under [`InsertColumns::FirstRow`] values are
/// looked up by the first row's column names and missing ones bind NULL.
/// Parameters are bound row by row.
pub fn build_insert(
    table: &str,
    rows: &[Row],
    style: Placeholder,
    policy: InsertColumns,
) -> DbResult<Option<BuiltQuery>> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };
    if first.is_empty() {
        return Err(DbError::validation(format!(
            "insert into {table}: first row has no columns"
        )));
    }
    if policy == InsertColumns::Strict {
        if let Some(idx) = rows.iter().position(|row| !row.same_columns(first)) {
            return Err(DbError::validation(format!(
                "insert into {table}: row {idx} columns differ from row 0"
            )));
        }
    }

    let columns: Vec<&str> = first.columns().collect();
    let mut w = SqlWriter::new(style);
    w.push("INSERT INTO ")
        .push(table)
        .push(" (")
        .push(&columns.join(", "))
        .push(") VALUES ");
    w.push_separated(rows, ", ", |w, row| {
        w.push("(");
        w.push_separated(&columns, ", ", |w, column| {
            w.push_bind(row.get(column).cloned().unwrap_or(Value::Null));
        });
        w.push(")");
    });
    Ok(Some(w.finish()))
}

impl<H: Handle> Executor<'_, H> {
    /// Insert `rows` into `table` with a single statement.
    ///
    /// An empty `rows` slice is a no-op: the handle is not contacted and the
    /// outcome carries an empty SQL string. Rows rejected by the column policy
    /// also leave the SQL empty. Returns the affected row count.
    pub async fn insert(&self, table: &str, rows: &[Row]) -> Outcome<u64> {
        let query = match build_insert(table, rows, self.placeholder(), self.config.insert_columns) {
            Ok(Some(query)) => query,
            Ok(None) => return Outcome::new(String::new(), Ok(0)),
            Err(err) => return self.finish(Operation::Insert, table, String::new(), Err(err)),
        };
        self.log_statement(Operation::Insert, table, &query);
        let result = self.handle.execute(&query.sql, &query.params).await;
        self.finish(Operation::Insert, table, query.sql, result)
    }
}
