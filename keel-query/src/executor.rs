//! The statement execution contract.

use async_trait::async_trait;
use keel_schema::Value;

use crate::error::Result;
use crate::row::Row;

/// Runs SQL with positional arguments against pooled connections.
///
/// Implementations rewrite the portable `?` placeholders to their native
/// syntax, hold one pooled connection for the duration of a call, and release
/// it on every exit path. Failures are propagated unchanged; nothing is
/// retried.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run a query and materialize its rows eagerly.
    ///
    /// With `limit`, at most that many rows are returned.
    async fn select(&self, sql: &str, args: &[Value], limit: Option<usize>) -> Result<Vec<Row>>;

    /// Run an insert, update, or delete and return the affected row count.
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for &E {
    async fn select(&self, sql: &str, args: &[Value], limit: Option<usize>) -> Result<Vec<Row>> {
        (**self).select(sql, args, limit).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
        (**self).execute(sql, args).await
    }
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    async fn select(&self, sql: &str, args: &[Value], limit: Option<usize>) -> Result<Vec<Row>> {
        (**self).select(sql, args, limit).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
        (**self).execute(sql, args).await
    }
}
