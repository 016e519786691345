//! An optional process-wide pool.
//!
//! Passing a [`MysqlPool`] explicitly is preferred. This handle exists for
//! applications that want one pool per process without threading it through
//! every call. It is set exactly once: a second [`init`] fails with
//! [`ConnError::AlreadyInitialized`] and leaves the first pool in place.
//!
//! ```rust,ignore
//! keel_mysql::global::init(ConnectOptions::from_env()?).await?;
//!
//! let user = User::find(keel_mysql::global::pool()?, 1).await?;
//! ```

use std::sync::OnceLock;

use keel_query::{ConnError, Result};
use tracing::info;

use crate::config::ConnectOptions;
use crate::pool::MysqlPool;

static POOL: OnceLock<MysqlPool> = OnceLock::new();

/// Open the process-wide pool, connecting eagerly as [`MysqlPool::open`] does.
pub async fn init(options: ConnectOptions) -> Result<()> {
    if POOL.get().is_some() {
        return Err(ConnError::AlreadyInitialized.into());
    }

    install(MysqlPool::open(options).await?)
}

/// Install an already opened pool as the process-wide pool.
pub fn install(pool: MysqlPool) -> Result<()> {
    POOL.set(pool).map_err(|_| ConnError::AlreadyInitialized)?;
    info!("process-wide pool initialized");
    Ok(())
}

/// The process-wide pool.
pub fn pool() -> Result<&'static MysqlPool> {
    POOL.get().ok_or_else(|| ConnError::NotInitialized.into())
}

/// Check whether [`init`] has completed.
pub fn is_initialized() -> bool {
    POOL.get().is_some()
}
