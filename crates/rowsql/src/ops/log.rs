use super::{BuiltQuery, Operation};
use crate::config::ExecConfig;
use crate::error::DbError;
use std::borrow::Cow;
use tracing::Level;

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            _ => tracing::trace!($($field)*),
        }
    };
}

/// Emit the statement about to be sent.
pub(super) fn statement(config: &ExecConfig, op: Operation, table: &str, query: &BuiltQuery) {
    if !config.logging_enabled {
        return;
    }
    let sql = truncate_sql(&query.sql, config.max_sql_length);
    emit_at_level!(
        config.log_level,
        target: "rowsql.sql",
        op = op.as_str(),
        table,
        param_count = query.params.len(),
        sql = %sql,
        "executing statement"
    );
}

pub(super) fn failure(config: &ExecConfig, op: Operation, table: &str, err: &DbError) {
    if !config.logging_enabled {
        return;
    }
    tracing::debug!(
        target: "rowsql.sql",
        op = op.as_str(),
        table,
        error = %err,
        "statement failed"
    );
}

fn truncate_sql(sql: &str, max: Option<usize>) -> Cow<'_, str> {
    match max {
        Some(max) if sql.len() > max => {
            Cow::Owned(format!("{}...", truncate_sql_bytes(sql, max)))
        }
        _ => Cow::Borrowed(sql),
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
