//! Mapping of `mysql_async` errors onto the Keel error taxonomy.
//!
//! The driver error is always kept as the source, unchanged.

use keel_query::{ConnError, Error, ErrorCode, QueryError};

/// ER_PARSE_ERROR
const ER_PARSE_ERROR: u16 = 1064;
/// ER_DUP_ENTRY
const ER_DUP_ENTRY: u16 = 1062;
/// ER_NO_REFERENCED_ROW_2
const ER_NO_REFERENCED_ROW: u16 = 1452;
/// ER_BAD_NULL_ERROR
const ER_BAD_NULL: u16 = 1048;

/// Error code for a MySQL server error number.
pub fn error_code(server_code: u16) -> ErrorCode {
    match server_code {
        ER_PARSE_ERROR => ErrorCode::SqlSyntax,
        ER_DUP_ENTRY => ErrorCode::UniqueConstraint,
        ER_NO_REFERENCED_ROW => ErrorCode::ForeignKeyConstraint,
        ER_BAD_NULL => ErrorCode::NotNullConstraint,
        _ => ErrorCode::DatabaseError,
    }
}

/// Map an error raised while running `sql`.
pub fn statement_error(err: mysql_async::Error, sql: &str) -> Error {
    let (code, message) = match &err {
        mysql_async::Error::Server(server) => (error_code(server.code), server.message.clone()),
        mysql_async::Error::Io(io) => (ErrorCode::ConnectionLost, io.to_string()),
        mysql_async::Error::Url(url) => return ConnError::config(url.to_string()).into(),
        other => (ErrorCode::DatabaseError, other.to_string()),
    };

    QueryError::new(code, message)
        .with_sql(sql)
        .with_source(err)
        .into()
}

/// Map an error raised while taking a connection from the pool.
pub fn acquire_error(err: mysql_async::Error) -> Error {
    match err {
        mysql_async::Error::Url(url) => ConnError::config(url.to_string()).into(),
        other => ConnError::acquire(other).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysql_async::ServerError;

    fn server(code: u16, message: &str) -> mysql_async::Error {
        mysql_async::Error::Server(ServerError {
            code,
            message: message.to_string(),
            state: "42000".to_string(),
        })
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(1064), ErrorCode::SqlSyntax);
        assert_eq!(error_code(1062), ErrorCode::UniqueConstraint);
        assert_eq!(error_code(1146), ErrorCode::DatabaseError);
    }

    #[test]
    fn test_statement_error_keeps_context() {
        let err = statement_error(server(1064, "syntax error near 'form'"), "select * form t");
        let query = err.as_query().unwrap();

        assert_eq!(query.code, ErrorCode::SqlSyntax);
        assert_eq!(query.sql.as_deref(), Some("select * form t"));
        assert!(query.source.is_some());
    }

    #[test]
    fn test_io_error_is_connection_lost() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = statement_error(mysql_async::Error::Io(io.into()), "delete from t");
        assert_eq!(err.as_query().unwrap().code, ErrorCode::ConnectionLost);
    }

    #[test]
    fn test_acquire_error_is_conn_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = acquire_error(mysql_async::Error::Io(io.into()));
        assert!(err.is_conn());
    }
}
