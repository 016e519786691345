//! # Keel
//!
//! A minimal async ORM for Rust.
//!
//! Keel provides:
//! - Models declared once with `#[derive(Model)]` or a schema builder
//! - SQL templates compiled once per model type and cached for the process
//! - `find`, `find_all`, `find_number`, `save`, `update`, and `remove` on any model
//! - A bounded MySQL connection pool with scoped connection leases
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keel::prelude::*;
//! use keel::mysql::{ConnectOptions, MysqlPool};
//!
//! #[derive(Debug, Model)]
//! #[keel(table = "users")]
//! pub struct User {
//!     #[keel(primary_key)]
//!     pub id: i64,
//!     pub name: Option<String>,
//!     pub email: Option<String>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), keel::Error> {
//!     let pool = MysqlPool::open(ConnectOptions::from_env()?).await?;
//!
//!     let mut user = User { id: 1, name: Some("ann".into()), email: None };
//!     user.save(&pool).await?;
//!
//!     let found = User::find(&pool, 1).await?;
//!     let count = User::find_number(&pool, "count(`id`)", None, &[]).await?;
//!
//!     pool.close().await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Field descriptors, schema compilation, and values.
pub mod schema {
    pub use keel_schema::*;
}

/// The executor contract, model operations, and SQL helpers.
pub mod query {
    pub use keel_query::*;
}

/// MySQL connection pool and executor.
#[cfg(feature = "mysql")]
#[cfg_attr(docsrs, doc(cfg(feature = "mysql")))]
pub mod mysql {
    pub use keel_mysql::*;
}

// Re-export the derive next to the trait it implements
pub use keel_codegen::Model;

pub use keel_query::logging;
pub use keel_query::{
    ConnError, DatabaseType, Error, ErrorCode, Executor, FieldDefault, FieldDescriptor, FieldType,
    FieldValue, FindOptions, FromValue, Limit, Model, ModelSchema, QueryError, Result, Row,
    RowError, SchemaBuilder, SchemaCache, SchemaError, Value, ValueError, rewrite_placeholders,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Error, Executor, FieldDescriptor, FindOptions, Limit, Model, ModelSchema, Result, Row,
        SchemaBuilder, Value,
    };
}
