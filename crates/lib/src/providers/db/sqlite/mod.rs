use crate::errors::StoreError;
use std::fmt::{self, Debug};
use tracing::debug;
use turso::Database;

pub mod sql;

/// A provider for the local SQLite database (via Turso) holding accounts,
/// favorites and search history.
///
/// The `Database` handle is cheap to clone and thread-safe. Cloning the
/// provider shares the same underlying database, which is how tests share a
/// single in-memory instance.
#[derive(Clone)]
pub struct SqliteProvider {
    pub db: Database,
}

impl SqliteProvider {
    /// Opens (or creates) the database at `db_path`.
    ///
    /// Use ":memory:" for a unique, isolated in-memory database.
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // WAL has no effect on in-memory databases but is safe to request.
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { db })
    }

    /// A helper for tests to pre-populate data by executing multiple SQL statements.
    pub async fn initialize_with_data(&self, init_sql: &str) -> Result<(), StoreError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        for statement in init_sql.split(';').filter(|s| !s.trim().is_empty()) {
            conn.execute(statement, ())
                .await
                .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Ensures that all required application tables and indexes exist.
    /// This function is idempotent and safe to call on every application startup.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ())
                .await
                .map_err(|e| StoreError::OperationFailed(e.to_string()))?;
        }
        debug!("Database schema is up to date.");
        Ok(())
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}
