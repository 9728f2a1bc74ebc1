//! [`Handle`] implementations for deadpool-postgres.
//!
//! A pooled client behaves like a plain `tokio_postgres::Client`, except that
//! `prepare_execute` goes through the per-connection statement cache; pooled
//! transactions do the same. A `Pool` checks out one connection per call and
//! returns it when the call finishes.

use crate::client::{Handle, pg_params};
use crate::error::DbResult;
use crate::ops::Placeholder;
use crate::row::Row;
use crate::value::Value;
use deadpool_postgres::{Client, ClientWrapper, Pool, Transaction};

impl Handle for Client {
    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }

    async fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        // Delegate to the deref target (tokio_postgres::Client).
        let client: &tokio_postgres::Client = self;
        Handle::query(client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        let client: &tokio_postgres::Client = self;
        Handle::execute(client, sql, params).await
    }

    async fn prepare_execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        let stmt = ClientWrapper::prepare_cached(self, sql).await?;
        Ok(tokio_postgres::Client::execute(self, &stmt, &pg_params(params)).await?)
    }
}

impl Handle for Transaction<'_> {
    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }

    async fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        Handle::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        Handle::execute(&**self, sql, params).await
    }

    async fn prepare_execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        let stmt = Transaction::prepare_cached(self, sql).await?;
        Ok(tokio_postgres::Transaction::execute(self, &stmt, &pg_params(params)).await?)
    }
}

impl Handle for Pool {
    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }

    async fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        let client = self.get().await?;
        Handle::query(&client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        let client = self.get().await?;
        Handle::execute(&client, sql, params).await
    }

    async fn prepare_execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
        let client = self.get().await?;
        Handle::prepare_execute(&client, sql, params).await
    }
}
