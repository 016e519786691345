//! MySQL driver for the Keel ORM.
//!
//! This crate provides the connection pool handle and the statement executor
//! for Keel models, on top of the `mysql_async` driver.
//!
//! # Features
//!
//! - Bounded connection pool with per-connection charset and autocommit setup
//! - Scoped connection leases returned to the pool on drop
//! - [`Executor`](keel_query::Executor) implementation for [`MysqlPool`]
//! - Options from code, URL, environment, or any serde source
//!
//! # Example
//!
//! ```rust,ignore
//! use keel_mysql::{ConnectOptions, MysqlPool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = MysqlPool::open(ConnectOptions::from_url("mysql://app:pw@localhost/shop")?).await?;
//!
//!     let user = User::find(&pool, 1).await?;
//!     pool.close().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod env;
pub mod error;
pub mod executor;
pub mod global;
pub mod pool;
pub mod types;

pub use config::ConnectOptions;
pub use connection::PooledConnection;
pub use env::{EnvSource, MapEnvSource, StdEnvSource};
pub use pool::{MysqlPool, MysqlPoolBuilder};
