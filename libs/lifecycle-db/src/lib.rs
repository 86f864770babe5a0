#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Lifecycle-managed persistence on top of `SeaORM`.
//!
//! The [`lifecycle`] module holds the interception layer; this crate root adds the
//! connection helper used by applications and tests.
//!
//! # Features
//! - `pg`, `mysql`, `sqlite`: enable the matching `SeaORM` driver (`sqlite` by default)
//!
//! # Example
//! ```rust,no_run
//! # async fn run() -> Result<(), sea_orm::DbErr> {
//! use lifecycle_db::{ConnectOpts, connect};
//!
//! let conn = connect("sqlite::memory:", ConnectOpts { max_conns: Some(1), ..Default::default() }).await?;
//! # drop(conn);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(any(feature = "pg", feature = "mysql", feature = "sqlite")),
    allow(unused_imports, dead_code)
)]

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

pub mod lifecycle;

pub use lifecycle::{
    AuditedEntity, ConfigError, LifecycleConfig, LifecycleConn, LifecycleError, LifecycleRegistry,
    OffsetTimestamp,
};

pub use lifecycle_db_macros::Audited;

/// Pool options for [`connect`].
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Log every statement through `tracing`.
    pub sqlx_logging: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            sqlx_logging: false,
        }
    }
}

/// Open a `SeaORM` connection pool.
///
/// In-memory `SQLite` databases exist per connection, so callers using
/// `sqlite::memory:` should set `max_conns: Some(1)`.
///
/// # Errors
/// Returns `DbErr` if the DSN is invalid or the database is unreachable.
pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(dsn.to_owned());
    if let Some(max) = opts.max_conns {
        options.max_connections(max);
    }
    if let Some(min) = opts.min_conns {
        options.min_connections(min);
    }
    if let Some(timeout) = opts.acquire_timeout {
        options.acquire_timeout(timeout);
    }
    options.sqlx_logging(opts.sqlx_logging);

    let conn = Database::connect(options).await?;
    info!(backend = ?conn.get_database_backend(), "database connected");
    Ok(conn)
}
