//! `SQLite` database connection and operations.
//!
//! The database is stored at `~/.cadence/cadence.db` and contains tables for:
//! - Tasks (templates, instances and one-off tasks)
//! - Per-user statistics snapshots

use rusqlite::Connection;

use crate::config::Paths;
use crate::error::CadenceError;

use super::migrations;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database under the given data paths.
    ///
    /// Creates the data directory, the database file and runs migrations if
    /// necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open(paths: &Paths) -> Result<Self, CadenceError> {
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &std::path::Path) -> Result<Self, CadenceError> {
        let conn = Connection::open(path).map_err(|e| {
            CadenceError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "opened database");

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, CadenceError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            CadenceError::Database(format!("Failed to open in-memory database: {e}"))
        })?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Run database migrations.
    fn migrate(&self) -> Result<(), CadenceError> {
        migrations::run(&self.conn)
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, CadenceError> {
        migrations::get_version(&self.conn)
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction, committing only if it succeeds.
    ///
    /// Statements issued through [`Database::connection`] while `f` runs are
    /// part of the transaction.
    ///
    /// # Errors
    ///
    /// Returns the error from `f` (after rolling back) or a database error if
    /// the transaction cannot be started or committed.
    pub fn in_transaction<T>(
        &self,
        f: impl FnOnce() -> Result<T, CadenceError>,
    ) -> Result<T, CadenceError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| CadenceError::Database(format!("Failed to begin transaction: {e}")))?;

        let value = f()?;

        tx.commit()
            .map_err(|e| CadenceError::Database(format!("Failed to commit transaction: {e}")))?;
        Ok(value)
    }
}
