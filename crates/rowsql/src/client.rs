//! The database handle abstraction.

use crate::error::DbResult;
use crate::ops::Placeholder;
use crate::row::Row;
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// An open connection (or pool) that statements are sent to.
///
/// The handle is owned by the caller, who is responsible for opening and closing
/// it. Implementations must pass driver failures through unchanged.
///
/// Implementations are provided for `tokio_postgres::Client`,
/// `tokio_postgres::Transaction` and, with the `pool` feature, deadpool pools and
/// pooled clients. Any other driver can be plugged in by implementing this trait.
pub trait Handle: Send + Sync {
    /// Placeholder style the handle expects in statement text.
    fn placeholder(&self) -> Placeholder {
        Placeholder::Question
    }

    /// Run a statement and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send;

    /// Run a statement and return the affected row count.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send;

    /// Prepare a statement, then execute it with `params`.
    ///
    /// The default implementation calls [`Handle::execute`].
    fn prepare_execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        self.execute(sql, params)
    }
}

impl<H: Handle> Handle for &H {
    fn placeholder(&self) -> Placeholder {
        (**self).placeholder()
    }

    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        (**self).execute(sql, params)
    }

    fn prepare_execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        (**self).prepare_execute(sql, params)
    }
}

/// Borrow values as tokio-postgres parameters.
pub(crate) fn pg_params(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

/// Implement [`Handle`] for a type exposing the tokio-postgres client API.
macro_rules! impl_pg_handle {
    ($ty:ty) => {
        impl Handle for $ty {
            fn placeholder(&self) -> Placeholder {
                Placeholder::Dollar
            }

            async fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
                let rows = <$ty>::query(self, sql, &pg_params(params)).await?;
                rows.iter().map(Row::from_pg).collect()
            }

            async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
                Ok(<$ty>::execute(self, sql, &pg_params(params)).await?)
            }

            async fn prepare_execute(&self, sql: &str, params: &[Value]) -> DbResult<u64> {
                let stmt = <$ty>::prepare(self, sql).await?;
                Ok(<$ty>::execute(self, &stmt, &pg_params(params)).await?)
            }
        }
    };
}

impl_pg_handle!(tokio_postgres::Client);
impl_pg_handle!(tokio_postgres::Transaction<'_>);
