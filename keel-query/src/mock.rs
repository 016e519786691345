//! A recording executor for exercising models without a database.
//!
//! Responses are scripted in order and consumed one per call. When the
//! script runs dry, selects return no rows and statements report one
//! affected row.
//!
//! ```rust,ignore
//! use keel_query::mock::MockExecutor;
//!
//! let db = MockExecutor::new();
//! db.push_rows(vec![Row::new().with("id", 1)]);
//!
//! let rows = db.select("select `id` from `t`", &[], None).await?;
//! assert_eq!(rows.len(), 1);
//! assert_eq!(db.calls()[0].sql, "select `id` from `t`");
//! ```

use std::collections::VecDeque;

use async_trait::async_trait;
use keel_schema::Value;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::row::Row;

/// Which executor entry point was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Select,
    Execute,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: CallKind,
    pub sql: String,
    pub args: Vec<Value>,
    pub limit: Option<usize>,
}

#[derive(Debug)]
enum Response {
    Rows(Vec<Row>),
    Affected(u64),
    Fail(Error),
}

/// Executor that records every call and replays scripted responses.
#[derive(Debug, Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<VecDeque<Response>>,
}

impl MockExecutor {
    /// Create an executor with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows for the next call.
    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.responses.lock().push_back(Response::Rows(rows));
        self
    }

    /// Queue an affected-row count for the next call.
    pub fn push_affected(&self, affected: u64) -> &Self {
        self.responses.lock().push_back(Response::Affected(affected));
        self
    }

    /// Queue a failure for the next call.
    pub fn push_error(&self, err: impl Into<Error>) -> &Self {
        self.responses.lock().push_back(Response::Fail(err.into()));
        self
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// The most recent call.
    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }

    /// Number of scripted responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.responses.lock().len()
    }

    fn record(&self, kind: CallKind, sql: &str, args: &[Value], limit: Option<usize>) -> Option<Response> {
        self.calls.lock().push(Call {
            kind,
            sql: sql.to_string(),
            args: args.to_vec(),
            limit,
        });
        self.responses.lock().pop_front()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn select(&self, sql: &str, args: &[Value], limit: Option<usize>) -> Result<Vec<Row>> {
        match self.record(CallKind::Select, sql, args, limit) {
            Some(Response::Rows(mut rows)) => {
                if let Some(limit) = limit {
                    rows.truncate(limit);
                }
                Ok(rows)
            }
            Some(Response::Affected(_)) | None => Ok(Vec::new()),
            Some(Response::Fail(err)) => Err(err),
        }
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> Result<u64> {
        match self.record(CallKind::Execute, sql, args, None) {
            Some(Response::Affected(n)) => Ok(n),
            Some(Response::Rows(rows)) => Ok(rows.len() as u64),
            Some(Response::Fail(err)) => Err(err),
            None => Ok(1),
        }
    }
}
