//! Table helpers: build and run SELECT, INSERT, UPDATE and DELETE.
//!
//! Each operation comes in two forms:
//!
//! - a pure builder (`build_select`, ...) that renders SQL text and the
//!   positional parameter list for a given [`Placeholder`] style;
//! - an async runner on [`Executor`] (and a free function of the same name that
//!   uses the default [`ExecConfig`]) that sends the statement through a
//!   [`Handle`] and returns an [`Outcome`].
//!
//! The generated SQL is always part of the [`Outcome`], including on failure.
//!
//! # Usage
//!
//! ```ignore
//! use rowsql::{Conditions, row};
//!
//! rowsql::insert(&client, "users", &[row! { "id" => 1, "name" => "alice" }])
//!     .await
//!     .into_result()?;
//!
//! let out = rowsql::select(&client, "users", &["id", "name"], &Conditions::new().eq("id", 1)).await;
//! println!("{}", out.sql);
//! let rows = out.into_result()?;
//! ```

mod delete;
mod insert;
mod log;
mod select;
mod update;
mod writer;

pub use delete::build_delete;
pub use insert::build_insert;
pub use select::build_select;
pub use update::build_update;
pub use writer::{BuiltQuery, Placeholder};

use crate::client::Handle;
use crate::condition::Conditions;
use crate::config::ExecConfig;
use crate::error::DbResult;
use crate::row::Row;

/// The kind of statement being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Select => "select",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// The SQL that was generated, together with the result of running it.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    /// Generated statement text. Empty when nothing was built.
    pub sql: String,
    pub result: DbResult<T>,
}

impl<T> Outcome<T> {
    pub(crate) fn new(sql: String, result: DbResult<T>) -> Self {
        Self { sql, result }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Drop the SQL and keep the result.
    pub fn into_result(self) -> DbResult<T> {
        self.result
    }

    pub fn into_parts(self) -> (String, DbResult<T>) {
        (self.sql, self.result)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            sql: self.sql,
            result: self.result.map(f),
        }
    }
}

/// Runs table helpers against a borrowed [`Handle`] with a fixed configuration.
#[derive(Debug)]
pub struct Executor<'h, H> {
    handle: &'h H,
    config: ExecConfig,
}

impl<'h, H: Handle> Executor<'h, H> {
    /// Create an executor with the default configuration.
    pub fn new(handle: &'h H) -> Self {
        Self::with_config(handle, ExecConfig::default())
    }

    pub fn with_config(handle: &'h H, config: ExecConfig) -> Self {
        Self { handle, config }
    }

    pub fn handle(&self) -> &'h H {
        self.handle
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Placeholder style used for generated SQL.
    pub fn placeholder(&self) -> Placeholder {
        self.config
            .placeholder
            .unwrap_or_else(|| self.handle.placeholder())
    }

    fn log_statement(&self, op: Operation, table: &str, query: &BuiltQuery) {
        log::statement(&self.config, op, table, query);
    }

    fn finish<T>(&self, op: Operation, table: &str, sql: String, result: DbResult<T>) -> Outcome<T> {
        if let Err(err) = &result {
            log::failure(&self.config, op, table, err);
        }
        Outcome::new(sql, result)
    }
}

/// Run `SELECT <columns> FROM <table> [WHERE ...]` with the default configuration.
///
/// See [`Executor::select`].
pub async fn select<H: Handle, C: AsRef<str>>(
    handle: &H,
    table: &str,
    columns: &[C],
    conditions: &Conditions,
) -> Outcome<Vec<Row>> {
    Executor::new(handle)
        .select(table, columns, conditions)
        .await
}

/// Insert `rows` with one multi-row statement, using the default configuration.
///
/// See [`Executor::insert`].
pub async fn insert<H: Handle>(handle: &H, table: &str, rows: &[Row]) -> Outcome<u64> {
    Executor::new(handle).insert(table, rows).await
}

/// Run `UPDATE <table> SET ... [WHERE ...]` with the default configuration.
///
/// See [`Executor::update`].
pub async fn update<H: Handle>(
    handle: &H,
    table: &str,
    data: &Row,
    conditions: &Conditions,
) -> Outcome<u64> {
    Executor::new(handle)
        .update(table, data, conditions)
        .await
}

/// Run `DELETE FROM <table> [WHERE ...]` with the default configuration.
///
/// See [`Executor::delete`].
pub async fn delete<H: Handle>(handle: &H, table: &str, conditions: &Conditions) -> Outcome<bool> {
    Executor::new(handle).delete(table, conditions).await
}

#[cfg(test)]
mod tests;
