//! Connection pool for MySQL.

use std::sync::Arc;

use keel_query::{ConnError, Result};
use mysql_async::Pool;
use mysql_async::prelude::Queryable;
use tracing::{debug, info};

use crate::config::ConnectOptions;
use crate::connection::PooledConnection;
use crate::error::acquire_error;

/// A connection pool for MySQL.
///
/// Cheap to clone; clones share the same pool. Borrowers beyond `max_size`
/// wait until a connection is released.
#[derive(Clone)]
pub struct MysqlPool {
    inner: Pool,
    options: Arc<ConnectOptions>,
}

impl MysqlPool {
    /// Open a pool and establish `min_size` connections before returning.
    ///
    /// A wrong host, bad credentials or a missing database fail here with a
    /// [`ConnError`] instead of on the first statement.
    pub async fn open(options: ConnectOptions) -> Result<Self> {
        let pool = Self::open_lazy(options)?;
        if let Err(err) = pool.warm_up().await {
            let _ = pool.inner.disconnect().await;
            return Err(err);
        }
        Ok(pool)
    }

    /// Open a pool without connecting. Connections are established on first use.
    pub fn open_lazy(options: ConnectOptions) -> Result<Self> {
        options.validate()?;
        let pool = Pool::new(options.to_opts()?);

        info!(
            host = %options.host,
            port = %options.port,
            database = %options.database,
            min_size = %options.min_size,
            max_size = %options.max_size,
            "MySQL connection pool created"
        );

        Ok(Self {
            inner: pool,
            options: Arc::new(options),
        })
    }

    /// Check out `min_size` connections (at least one), ping each, and
    /// release them back to the pool.
    async fn warm_up(&self) -> Result<()> {
        let count = self.options.min_size.max(1);
        let mut held = Vec::with_capacity(count);
        for _ in 0..count {
            let mut conn = self.acquire().await?;
            conn.inner_mut().ping().await.map_err(acquire_error)?;
            held.push(conn);
        }
        debug!(connections = held.len(), "pool warmed up");
        Ok(())
    }

    /// Open a pool from a `mysql://` URL.
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        Self::open(ConnectOptions::from_url(url)?).await
    }

    /// Lease a connection. It is returned to the pool when dropped.
    pub async fn acquire(&self) -> Result<PooledConnection> {
        debug!("acquiring connection from pool");
        let conn = self.inner.get_conn().await.map_err(acquire_error)?;
        Ok(PooledConnection::new(conn))
    }

    /// The options the pool was opened with.
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Check if the pool can hand out a working connection.
    pub async fn is_healthy(&self) -> bool {
        match self.acquire().await {
            Ok(mut conn) => conn.ping().await.is_ok(),
            Err(_) => false,
        }
    }

    /// Disconnect all connections and close the pool.
    pub async fn close(self) -> Result<()> {
        self.inner.disconnect().await.map_err(ConnError::acquire)?;
        info!("MySQL connection pool closed");
        Ok(())
    }

    /// Create a builder for configuring the pool.
    pub fn builder() -> MysqlPoolBuilder {
        MysqlPoolBuilder::new()
    }
}

impl std::fmt::Debug for MysqlPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlPool")
            .field("host", &self.options.host)
            .field("database", &self.options.database)
            .finish_non_exhaustive()
    }
}

/// Builder for creating a connection pool.
#[derive(Debug, Default)]
pub struct MysqlPoolBuilder {
    options: Option<ConnectOptions>,
    url: Option<String>,
    max_size: Option<usize>,
    min_size: Option<usize>,
}

impl MysqlPoolBuilder {
    /// Create a new pool builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the options.
    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the maximum number of connections.
    pub fn max_size(mut self, n: usize) -> Self {
        self.max_size = Some(n);
        self
    }

    /// Set the minimum number of connections.
    pub fn min_size(mut self, n: usize) -> Self {
        self.min_size = Some(n);
        self
    }

    /// Resolve the final options without opening the pool.
    pub fn build_options(self) -> Result<ConnectOptions> {
        let mut options = if let Some(options) = self.options {
            options
        } else if let Some(url) = self.url {
            ConnectOptions::from_url(url)?
        } else {
            return Err(ConnError::config("no database URL or options provided").into());
        };

        if let Some(n) = self.max_size {
            options.max_size = n;
        }
        if let Some(n) = self.min_size {
            options.min_size = n;
        }
        options.validate()?;
        Ok(options)
    }

    /// Build the connection pool.
    pub async fn build(self) -> Result<MysqlPool> {
        MysqlPool::open(self.build_options()?).await
    }
}
