//! A connection leased from the pool.

use keel_query::logging::{log_rows_affected, log_rows_returned, log_statement};
use keel_query::{DatabaseType, Result, Row, Value, rewrite_placeholders};
use mysql_async::prelude::*;
use mysql_async::{Conn, Params};

use crate::error::statement_error;
use crate::types::{convert_row, to_mysql};

/// A pooled MySQL connection.
///
/// The connection goes back to the pool when this value is dropped, which
/// covers normal return, early return on error, and a cancelled future.
pub struct PooledConnection {
    conn: Conn,
}

impl PooledConnection {
    pub(crate) fn new(conn: Conn) -> Self {
        Self { conn }
    }

    /// Run a query and materialize at most `limit` rows.
    pub async fn select(&mut self, sql: &str, args: &[Value], limit: Option<usize>) -> Result<Vec<Row>> {
        log_statement(sql, args);
        let sql = rewrite_placeholders(sql, DatabaseType::MySQL);

        let rows: Vec<mysql_async::Row> = self
            .conn
            .exec(sql.as_str(), params(args))
            .await
            .map_err(|e| statement_error(e, &sql))?;

        let rows = rows
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(convert_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        log_rows_returned(rows.len());
        Ok(rows)
    }

    /// Run a statement and return the affected row count.
    pub async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64> {
        log_statement(sql, args);
        let sql = rewrite_placeholders(sql, DatabaseType::MySQL);

        self.conn
            .exec_drop(sql.as_str(), params(args))
            .await
            .map_err(|e| statement_error(e, &sql))?;

        let affected = self.conn.affected_rows();
        log_rows_affected(affected);
        Ok(affected)
    }

    /// Check the connection with a round-trip.
    pub async fn ping(&mut self) -> Result<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| statement_error(e, "PING"))
    }

    /// Get the inner connection.
    pub fn inner(&self) -> &Conn {
        &self.conn
    }

    /// Get the inner connection mutably.
    pub fn inner_mut(&mut self) -> &mut Conn {
        &mut self.conn
    }
}

fn params(args: &[Value]) -> Params {
    if args.is_empty() {
        Params::Empty
    } else {
        Params::Positional(args.iter().map(to_mysql).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_positional() {
        assert_eq!(params(&[]), Params::Empty);
        assert_eq!(
            params(&[Value::Int(1), Value::Null]),
            Params::Positional(vec![mysql_async::Value::Int(1), mysql_async::Value::NULL])
        );
    }
}
