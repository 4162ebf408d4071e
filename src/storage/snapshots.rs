//! Cached statistics snapshots, one row per user.
//!
//! The cache is a materialized view over the `tasks` table: a task mutation
//! invalidates the user's row and the recomputed snapshot replaces it. A
//! missing row simply means "recompute on next read".

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::tasks::{format_timestamp, parse_timestamp};
use super::Database;
use crate::error::CadenceError;
use crate::features::stats::StatisticsSnapshot;
use crate::tasks::Task;

pub struct SnapshotCache<'a> {
    db: &'a Database,
}

impl<'a> SnapshotCache<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Read the cached snapshot for a user, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn get(&self, user_id: &str) -> Result<Option<StatisticsSnapshot>, CadenceError> {
        let row = self
            .db
            .connection()
            .query_row(
                r"SELECT completion_rate, total_tasks, completed_tasks,
                         category_distribution, streak, last_updated
                  FROM statistics WHERE user_id = ?1",
                [user_id],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, usize>(1)?,
                        row.get::<_, usize>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, usize>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| CadenceError::Database(format!("Failed to query statistics: {e}")))?;

        let Some((completion_rate, total_tasks, completed_tasks, distribution, streak, updated)) = row
        else {
            return Ok(None);
        };

        let category_distribution: BTreeMap<String, usize> = serde_json::from_str(&distribution)?;

        Ok(Some(StatisticsSnapshot {
            completion_rate,
            total_tasks,
            completed_tasks,
            category_distribution,
            streak,
            last_updated: parse_timestamp(&updated)?,
        }))
    }

    /// Store a snapshot, replacing any existing one for the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn put(&self, user_id: &str, snapshot: &StatisticsSnapshot) -> Result<(), CadenceError> {
        let distribution = serde_json::to_string(&snapshot.category_distribution)?;

        self.db
            .connection()
            .execute(
                r"INSERT INTO statistics (user_id, completion_rate, total_tasks, completed_tasks,
                                          category_distribution, streak, last_updated)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                  ON CONFLICT(user_id) DO UPDATE SET
                    completion_rate = excluded.completion_rate,
                    total_tasks = excluded.total_tasks,
                    completed_tasks = excluded.completed_tasks,
                    category_distribution = excluded.category_distribution,
                    streak = excluded.streak,
                    last_updated = excluded.last_updated",
                params![
                    user_id,
                    snapshot.completion_rate,
                    snapshot.total_tasks,
                    snapshot.completed_tasks,
                    distribution,
                    snapshot.streak,
                    format_timestamp(snapshot.last_updated),
                ],
            )
            .map_err(|e| CadenceError::Database(format!("Failed to store statistics: {e}")))?;

        Ok(())
    }

    /// Drop the cached snapshot for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn invalidate(&self, user_id: &str) -> Result<(), CadenceError> {
        self.db
            .connection()
            .execute("DELETE FROM statistics WHERE user_id = ?1", [user_id])
            .map_err(|e| CadenceError::Database(format!("Failed to invalidate statistics: {e}")))?;
        Ok(())
    }

    /// Recompute the snapshot from `tasks` and store it.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be stored.
    pub fn refresh(
        &self,
        user_id: &str,
        tasks: &[Task],
        as_of: DateTime<Utc>,
    ) -> Result<StatisticsSnapshot, CadenceError> {
        let snapshot = StatisticsSnapshot::compute(tasks, as_of);
        self.put(user_id, &snapshot)?;
        tracing::debug!(
            user = user_id,
            total = snapshot.total_tasks,
            streak = snapshot.streak,
            "refreshed statistics"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 8, 30, 0).unwrap()
    }

    fn tasks() -> Vec<Task> {
        let mut done = Task::new("a", "alice", "Done", as_of());
        done.category = "work".to_string();
        done.set_completed(true, as_of());
        vec![done, Task::new("b", "alice", "Open", as_of())]
    }

    #[test]
    fn test_get_missing() {
        let db = Database::open_in_memory().unwrap();
        assert!(SnapshotCache::new(&db).get("alice").unwrap().is_none());
    }

    #[test]
    fn test_refresh_then_get() {
        let db = Database::open_in_memory().unwrap();
        let cache = SnapshotCache::new(&db);

        let snapshot = cache.refresh("alice", &tasks(), as_of()).unwrap();
        assert_eq!(snapshot.completion_rate, 50);
        assert_eq!(snapshot.streak, 1);

        assert_eq!(cache.get("alice").unwrap(), Some(snapshot));
    }

    #[test]
    fn test_put_overwrites_in_place() {
        let db = Database::open_in_memory().unwrap();
        let cache = SnapshotCache::new(&db);

        cache.refresh("alice", &tasks(), as_of()).unwrap();
        cache.refresh("alice", &[], as_of()).unwrap();

        let rows: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM statistics", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(cache.get("alice").unwrap().unwrap().total_tasks, 0);
    }

    #[test]
    fn test_invalidate() {
        let db = Database::open_in_memory().unwrap();
        let cache = SnapshotCache::new(&db);

        cache.refresh("alice", &tasks(), as_of()).unwrap();
        cache.refresh("bob", &tasks(), as_of()).unwrap();
        cache.invalidate("alice").unwrap();

        assert!(cache.get("alice").unwrap().is_none());
        assert!(cache.get("bob").unwrap().is_some());
    }
}
