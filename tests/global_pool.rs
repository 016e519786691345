//! Integration test for the process-wide pool handle.
//!
//! Kept in its own test binary since the handle can only be set once per
//! process.

#![cfg(feature = "mysql")]

use keel::ConnError;
use keel::Error;
use keel::mysql::{ConnectOptions, MysqlPool, global};

#[tokio::test]
async fn test_global_pool_lifecycle() {
    assert!(matches!(
        global::pool(),
        Err(Error::Conn(ConnError::NotInitialized))
    ));

    let pool = MysqlPool::open_lazy(ConnectOptions::new("app", "pw", "shop")).unwrap();
    global::install(pool).unwrap();
    assert!(global::is_initialized());
    assert_eq!(global::pool().unwrap().options().database, "shop");

    let second = global::init(ConnectOptions::new("other", "pw", "other")).await;
    assert!(matches!(
        second,
        Err(Error::Conn(ConnError::AlreadyInitialized))
    ));
    assert_eq!(global::pool().unwrap().options().database, "shop");

    let third = MysqlPool::open_lazy(ConnectOptions::new("app", "pw", "third")).unwrap();
    assert!(matches!(
        global::install(third),
        Err(Error::Conn(ConnError::AlreadyInitialized))
    ));
    assert_eq!(global::pool().unwrap().options().database, "shop");
}
