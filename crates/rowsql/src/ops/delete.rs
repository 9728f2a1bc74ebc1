use super::writer::{BuiltQuery, Placeholder, SqlWriter};
use super::{Executor, Operation, Outcome};
use crate::client::Handle;
use crate::condition::Conditions;
use crate::config::handle_dangerous_dml;

/// Build `DELETE FROM <table> [WHERE c1 = ? AND ...]`.
pub fn build_delete(table: &str, conditions: &Conditions, style: Placeholder) -> BuiltQuery {
    let mut w = SqlWriter::new(style);
    w.push("DELETE FROM ").push(table).push_where(conditions);
    w.finish()
}

impl<H: Handle> Executor<'_, H> {
    /// Delete the rows of `table` matching `conditions`.
    ///
    /// Returns `true` if at least one row was removed, `false` if none matched.
    pub async fn delete(&self, table: &str, conditions: &Conditions) -> Outcome<bool> {
        let query = build_delete(table, conditions, self.placeholder());
        if conditions.is_empty() {
            if let Err(err) = handle_dangerous_dml(
                self.config.delete_without_where,
                "DELETE without WHERE",
                &query.sql,
            ) {
                return self.finish(Operation::Delete, table, query.sql, Err(err));
            }
        }
        self.log_statement(Operation::Delete, table, &query);
        let result = self
            .handle
            .execute(&query.sql, &query.params)
            .await
            .map(|affected| affected > 0);
        self.finish(Operation::Delete, table, query.sql, result)
    }
}
