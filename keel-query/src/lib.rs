//! # keel-query
//!
//! The executor contract and the model operations of the Keel ORM.
//!
//! This crate provides:
//! - [`Executor`]: run portable `?`-placeholder SQL against pooled connections
//! - [`Model`]: `find`, `find_all`, `find_number`, `save`, `update`, `remove`
//! - [`Row`]: eagerly materialized result rows
//! - [`Error`]: schema, connection, and statement failures
//!
//! Drivers live in their own crates (`keel-mysql`). With the `testing`
//! feature, [`mock::MockExecutor`] records calls instead of talking to a
//! database.
//!
//! ## Example
//!
//! ```rust,ignore
//! use keel_query::prelude::*;
//!
//! let recent = Comment::find_all(
//!     &pool,
//!     FindOptions::new()
//!         .filter("`blog_id`=?", ["b-001"])
//!         .order_by("`created_at` desc")
//!         .limit(10u64),
//! )
//! .await?;
//! ```

pub mod error;
pub mod executor;
pub mod logging;
pub mod model;
pub mod row;
pub mod sql;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use keel_schema::{
    FieldDefault, FieldDescriptor, FieldType, FieldValue, FromValue, ModelSchema, SchemaBuilder,
    SchemaCache, SchemaError, SchemaResult, Value, ValueError,
};

pub use error::{ConnError, Error, ErrorCode, QueryError, QueryResult, Result};
pub use executor::Executor;
pub use model::Model;
pub use row::{Row, RowError};
pub use sql::{DatabaseType, FindOptions, Limit, rewrite_placeholders};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::executor::Executor;
    pub use crate::model::Model;
    pub use crate::row::Row;
    pub use crate::sql::{FindOptions, Limit};
    pub use keel_schema::{FieldDescriptor, ModelSchema, SchemaBuilder, Value};
}
