//! Error types for query execution.
//!
//! Three failure families reach callers:
//!
//! - [`SchemaError`] when a model fails to compile
//! - [`ConnError`] when the pool cannot be set up or a connection cannot be acquired
//! - [`QueryError`] when a statement fails or its rows cannot be materialized
//!
//! Driver errors are kept as the `source` of the error they are wrapped in,
//! never rewritten.
//!
//! ```rust
//! use keel_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::new(ErrorCode::SqlSyntax, "near 'form'")
//!     .with_sql("select * form `User`");
//! assert_eq!(err.code, ErrorCode::SqlSyntax);
//! assert_eq!(err.to_string(), "[K5002] near 'form'");
//! ```

use std::fmt;

use keel_schema::SchemaError;
use thiserror::Error;

use crate::row::RowError;

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for statement-level operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Any error surfaced by a model or executor operation.
#[derive(Error, Debug)]
pub enum Error {
    /// The model schema failed to compile.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Pool initialization or acquisition failed.
    #[error(transparent)]
    Conn(#[from] ConnError),
    /// Statement execution or row materialization failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl Error {
    /// Get the query error, if this is one.
    pub fn as_query(&self) -> Option<&QueryError> {
        match self {
            Self::Query(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this is a connection error.
    pub fn is_conn(&self) -> bool {
        matches!(self, Self::Conn(_))
    }
}

impl From<RowError> for Error {
    fn from(err: RowError) -> Self {
        Self::Query(err.into())
    }
}

/// Errors from the connection pool handle.
#[derive(Error, Debug)]
pub enum ConnError {
    /// The process-wide pool was initialized twice.
    #[error("connection pool is already initialized")]
    AlreadyInitialized,

    /// The process-wide pool was used before initialization.
    #[error("connection pool is not initialized")]
    NotInitialized,

    /// Invalid connection options.
    #[error("invalid connection options: {0}")]
    Config(String),

    /// A connection could not be acquired.
    #[error("failed to acquire connection: {source}")]
    Acquire {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConnError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap a driver error raised while acquiring a connection.
    pub fn acquire<E: std::error::Error + Send + Sync + 'static>(source: E) -> Self {
        Self::Acquire {
            source: Box::new(source),
        }
    }
}

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Constraint errors (2xxx)
    /// Unique constraint violation (K2001).
    UniqueConstraint = 2001,
    /// Foreign key constraint violation (K2002).
    ForeignKeyConstraint = 2002,
    /// Not null constraint violation (K2004).
    NotNullConstraint = 2004,

    // Connection errors (3xxx)
    /// Connection lost mid-statement (K3001).
    ConnectionLost = 3001,

    // Query execution errors (5xxx)
    /// SQL syntax error (K5002).
    SqlSyntax = 5002,
    /// Invalid parameter (K5003).
    InvalidParameter = 5003,
    /// General database error (K5005).
    DatabaseError = 5005,

    // Data errors (6xxx)
    /// Row could not be materialized (K6003).
    DeserializationError = 6003,

    // Internal errors (9xxx)
    /// Internal error (K9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "K5002").
    pub fn code(&self) -> String {
        format!("K{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UniqueConstraint => "Unique constraint violation",
            Self::ForeignKeyConstraint => "Foreign key constraint violation",
            Self::NotNullConstraint => "Not null constraint violation",
            Self::ConnectionLost => "Connection lost",
            Self::SqlSyntax => "SQL syntax error",
            Self::InvalidParameter => "Invalid parameter",
            Self::DatabaseError => "Database error",
            Self::DeserializationError => "Deserialization error",
            Self::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A statement failed or its result could not be materialized.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The statement text, if known.
    pub sql: Option<String>,
    /// The driver error, unchanged.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            sql: None,
            source: None,
        }
    }

    /// Set the statement text.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a general database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeserializationError, message)
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameter, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Check if this is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::UniqueConstraint
                | ErrorCode::ForeignKeyConstraint
                | ErrorCode::NotNullConstraint
        )
    }
}

impl From<RowError> for QueryError {
    fn from(err: RowError) -> Self {
        QueryError::deserialization(err.to_string()).with_source(err)
    }
}
