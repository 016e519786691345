//! The pool as a statement executor.

use async_trait::async_trait;
use keel_query::{Executor, Result, Row, Value};
use tracing::instrument;

use crate::pool::MysqlPool;

/// Each call leases one connection for its duration and returns it on every
/// exit path.
#[async_trait]
impl Executor for MysqlPool {
    #[instrument(skip(self, args), fields(db = %self.options().database))]
    async fn select(&self, sql: &str, args: &[Value], limit: Option<usize>) -> Result<Vec<Row>> {
        let mut conn = self.acquire().await?;
        conn.select(sql, args, limit).await
    }

    #[instrument(skip(self, args), fields(db = %self.options().database))]
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
        let mut conn = self.acquire().await?;
        conn.execute(sql, args).await
    }
}
