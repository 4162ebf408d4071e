//! Database migrations for cadence.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::CadenceError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, CadenceError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| CadenceError::Database(format!("Failed to get schema version: {e}")))
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), CadenceError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| CadenceError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), CadenceError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        tracing::info!(version, "applying database migration");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), CadenceError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(CadenceError::Database(format!("Unknown migration version: {version}"))),
    }
}

/// Migration v1: Initial schema.
///
/// Creates tables for:
/// - `tasks`: every task, with JSON columns for labels, recurrence and reminder
/// - `statistics`: one cached snapshot per user
fn migrate_v1(conn: &Connection) -> Result<(), CadenceError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            due_date TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            priority TEXT NOT NULL DEFAULT 'medium',
            category TEXT NOT NULL DEFAULT 'default',
            labels TEXT NOT NULL DEFAULT '[]',
            recurrence TEXT,
            reminder TEXT,
            progress INTEGER NOT NULL DEFAULT 0,
            parent_task_id TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_user
        ON tasks(user_id);

        CREATE INDEX IF NOT EXISTS idx_tasks_parent
        ON tasks(parent_task_id);

        -- Derived per-user statistics, rewritten on every task mutation
        CREATE TABLE IF NOT EXISTS statistics (
            user_id TEXT PRIMARY KEY,
            completion_rate INTEGER NOT NULL,
            total_tasks INTEGER NOT NULL,
            completed_tasks INTEGER NOT NULL,
            category_distribution TEXT NOT NULL,
            streak INTEGER NOT NULL,
            last_updated TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| CadenceError::Database(format!("Migration v1 failed: {e}")))
}
