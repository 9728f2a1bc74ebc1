//! # rowsql
//!
//! Small helpers that build and run parameterized SELECT, INSERT, UPDATE and
//! DELETE statements, translating between driver rows and generic
//! column → value [`Row`]s.
//!
//! ## Features
//!
//! - **Explicit handle**: every operation takes the caller's [`Handle`]; there is no global connection
//! - **Deterministic SQL**: columns and [`Conditions`] render in the order given
//! - **SQL always returned**: each call yields an [`Outcome`] carrying the generated statement, even on failure
//! - **Pass-through errors**: driver errors surface unchanged in [`DbError::Query`]
//! - **Structured logging**: statements are emitted as `tracing` events on the `rowsql.sql` target
//!
//! ## Example
//!
//! ```ignore
//! use rowsql::{Conditions, row};
//!
//! let rows = vec![
//!     row! { "id" => 1, "name" => "alice" },
//!     row! { "id" => 2, "name" => "bob" },
//! ];
//! rowsql::insert(&client, "users", &rows).await.into_result()?;
//!
//! let out = rowsql::select(&client, "users", &["id", "name"], &Conditions::new().eq("id", 1)).await;
//! tracing::info!(sql = %out.sql, "ran");
//! let users = out.into_result()?;
//!
//! rowsql::update(&client, "users", &row! { "name" => "alicia" }, &Conditions::new().eq("id", 1))
//!     .await
//!     .into_result()?;
//!
//! let removed = rowsql::delete(&client, "users", &Conditions::new().eq("id", 2))
//!     .await
//!     .into_result()?;
//! ```

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod ops;
pub mod row;
pub mod value;

#[cfg(feature = "pool")]
pub mod pool;

pub use client::Handle;
pub use condition::Conditions;
pub use config::{DangerousDmlPolicy, ExecConfig, InsertColumns};
pub use error::{DbError, DbResult};
pub use ops::{
    BuiltQuery, Executor, Operation, Outcome, Placeholder, build_delete, build_insert,
    build_select, build_update, delete, insert, select, update,
};
pub use row::Row;
pub use value::Value;
