use super::writer::{BuiltQuery, Placeholder, SqlWriter};
use super::{Executor, Operation, Outcome};
use crate::client::Handle;
use crate::condition::Conditions;
use crate::config::handle_dangerous_dml;
use crate::error::DbError;
use crate::row::Row;

/// Build `UPDATE <table> SET k1 = ?, k2 = ? [WHERE c1 = ? AND ...]`.
///
/// SET values are bound before WHERE values.
pub fn build_update(
    table: &str,
    data: &Row,
    conditions: &Conditions,
    style: Placeholder,
) -> BuiltQuery {
    let mut w = SqlWriter::new(style);
    w.push("UPDATE ").push(table).push(" SET ");
    w.push_separated(data.iter(), ", ", |w, (column, value)| {
        w.push(column).push(" = ").push_bind(value.clone());
    });
    w.push_where(conditions);
    w.finish()
}

impl<H: Handle> Executor<'_, H> {
    /// Set the columns of `data` on every row of `table` matching `conditions`.
    ///
    /// The statement is prepared and then executed. Empty `data` is rejected
    /// without contacting the handle. Returns the affected row count.
    pub async fn update(&self, table: &str, data: &Row, conditions: &Conditions) -> Outcome<u64> {
        let query = build_update(table, data, conditions, self.placeholder());
        if data.is_empty() {
            let err = DbError::validation(format!("update {table}: no columns to set"));
            return self.finish(Operation::Update, table, query.sql, Err(err));
        }
        if conditions.is_empty() {
            if let Err(err) = handle_dangerous_dml(
                self.config.update_without_where,
                "UPDATE without WHERE",
                &query.sql,
            ) {
                return self.finish(Operation::Update, table, query.sql, Err(err));
            }
        }
        self.log_statement(Operation::Update, table, &query);
        let result = self.handle.prepare_execute(&query.sql, &query.params).await;
        self.finish(Operation::Update, table, query.sql, result)
    }
}
