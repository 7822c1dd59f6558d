//! Database connection helpers.
//!
//! Every repository call borrows a connection from a Diesel r2d2 pool. The
//! pool applies the SQLite pragmas the schema relies on (foreign keys for the
//! `RESTRICT`/`CASCADE` rules between clients, projects, contracts, entries
//! and meetings) each time a connection is handed out, and registers the
//! [`fold_case`] SQL function used by text search.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::define_sql_function;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sql_types::{Nullable, Text};
use diesel::sqlite::SqliteConnection;
use log::error;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

define_sql_function! {
    /// Unicode lowercase. SQLite's own `lower` and `LIKE` only fold ASCII,
    /// so `LIKE` on `fold_case(column)` against a lowercased pattern is the
    /// case-insensitive match for accented text.
    fn fold_case(text: Nullable<Text>) -> Nullable<Text>;
}

fn fold_case_impl(text: Option<String>) -> Option<String> {
    text.map(|value| value.to_lowercase())
}

#[derive(Debug, Clone, Copy)]
/// Pragmas applied each time a connection is acquired from the pool.
pub struct ConnectionOptions {
    /// Enable Write Ahead Logging mode for SQLite.
    pub enable_wal: bool,
    /// Enforce foreign key checks for SQLite.
    pub enable_foreign_keys: bool,
    /// Timeout to wait for a locked database.
    pub busy_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            enable_wal: true,
            enable_foreign_keys: true,
            busy_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let mut pragmas = String::new();
        if self.enable_wal {
            pragmas.push_str("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        if self.enable_foreign_keys {
            pragmas.push_str("PRAGMA foreign_keys = ON;");
        }
        if let Some(timeout) = self.busy_timeout {
            pragmas.push_str(&format!("PRAGMA busy_timeout = {};", timeout.as_millis()));
        }

        if !pragmas.is_empty() {
            conn.batch_execute(&pragmas)
                .map_err(diesel::r2d2::Error::QueryError)?;
        }

        fold_case_utils::register_impl(conn, fold_case_impl)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given SQLite database URL with the default pragmas.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    establish_connection_pool_with(database_url, ConnectionOptions::default())
}

/// Create a connection pool applying the provided [`ConnectionOptions`].
pub fn establish_connection_pool_with(
    database_url: &str,
    options: ConnectionOptions,
) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(options))
        .build(manager)
}

/// Retrieve a connection from the pool, logging acquisition failures.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    pool.get().inspect_err(|e| {
        error!("Failed to get connection from pool: {e}");
    })
}

#[cfg(test)]
mod tests {
    use diesel::dsl::sql;
    use diesel::prelude::*;

    use super::*;

    #[test]
    fn fold_case_lowers_accented_letters() {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        ConnectionOptions::default().on_acquire(&mut conn).unwrap();

        let folded = diesel::select(fold_case(sql::<Nullable<Text>>("'SÃO JOÃO'")))
            .get_result::<Option<String>>(&mut conn)
            .unwrap();
        assert_eq!(folded.as_deref(), Some("são joão"));

        let null = diesel::select(fold_case(sql::<Nullable<Text>>("NULL")))
            .get_result::<Option<String>>(&mut conn)
            .unwrap();
        assert_eq!(null, None);
    }
}
