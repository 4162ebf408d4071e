//! Task operations on top of storage.
//!
//! Every mutation runs in one transaction together with the invalidation of
//! the user's statistics snapshot, and the snapshot is recomputed right
//! after commit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::{Clock, SystemClock};
use crate::error::CadenceError;
use crate::features::board::BoardState;
use crate::features::recurrence;
use crate::features::reminders;
use crate::features::stats::StatisticsSnapshot;
use crate::storage::{Database, SnapshotCache, TaskStore};
use crate::tasks::{NewTask, Task, TaskDefaults, TaskPatch, TaskQuery};

/// Result of creating a task: the stored task and any generated instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub task: Task,
    pub instances: Vec<Task>,
}

pub struct TaskService<'a, C: Clock = SystemClock> {
    db: &'a Database,
    clock: C,
    defaults: TaskDefaults,
}

impl<'a> TaskService<'a, SystemClock> {
    #[must_use]
    pub fn new(db: &'a Database, defaults: TaskDefaults) -> Self {
        Self::with_clock(db, SystemClock, defaults)
    }
}

impl<'a, C: Clock> TaskService<'a, C> {
    #[must_use]
    pub fn with_clock(db: &'a Database, clock: C, defaults: TaskDefaults) -> Self {
        Self {
            db,
            clock,
            defaults,
        }
    }

    /// The service's notion of "now", for resolving relative dates.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn store(&self) -> TaskStore<'a> {
        TaskStore::new(self.db)
    }

    fn cache(&self) -> SnapshotCache<'a> {
        SnapshotCache::new(self.db)
    }

    /// Create a task, expanding it first if it recurs.
    ///
    /// The template is stored as submitted, then its instances, then the
    /// template again with `lastGenerated` stamped. All of it commits or none
    /// of it does.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::Validation` for a bad title or progress,
    /// `CadenceError::InvalidRecurrence` for an unusable rule (nothing is
    /// stored), or a database error.
    pub fn create(&self, user_id: &str, new_task: NewTask) -> Result<Created, CadenceError> {
        let now = self.clock.now();
        let task = new_task.into_task(Uuid::new_v4().to_string(), user_id, now, &self.defaults)?;

        let (task, instances) = if task.is_recurring() {
            let mut template = task.clone();
            let instances = recurrence::expand(&mut template, now)?;

            self.db.in_transaction(|| {
                let store = self.store();
                store.insert(&task)?;
                store.insert_many(&instances)?;
                store.update(&template)?;
                self.cache().invalidate(user_id)
            })?;
            (template, instances)
        } else {
            self.db.in_transaction(|| {
                self.store().insert(&task)?;
                self.cache().invalidate(user_id)
            })?;
            (task, Vec::new())
        };

        tracing::info!(
            user = user_id,
            id = %task.id,
            instances = instances.len(),
            "created task"
        );
        self.refresh_statistics(user_id)?;

        Ok(Created { task, instances })
    }

    /// Fetch one task.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::NotFound` if the user has no task with `id`.
    pub fn get(&self, user_id: &str, id: &str) -> Result<Task, CadenceError> {
        self.store()
            .get(user_id, id)?
            .ok_or_else(|| CadenceError::NotFound(format!("task {id}")))
    }

    /// Instances generated from a template, by due date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn instances(&self, user_id: &str, template_id: &str) -> Result<Vec<Task>, CadenceError> {
        self.store().instances_of(user_id, template_id)
    }

    /// Apply a patch to a task.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::NotFound` if the task does not exist for this
    /// user, `CadenceError::Validation` for invalid fields, or a database error.
    pub fn update(&self, user_id: &str, id: &str, patch: TaskPatch) -> Result<Task, CadenceError> {
        let mut task = self.get(user_id, id)?;
        patch.apply(&mut task, self.clock.now())?;
        self.save(user_id, task)
    }

    fn save(&self, user_id: &str, task: Task) -> Result<Task, CadenceError> {
        self.db.in_transaction(|| {
            if !self.store().update(&task)? {
                return Err(CadenceError::NotFound(format!("task {}", task.id)));
            }
            self.cache().invalidate(user_id)
        })?;

        tracing::info!(user = user_id, id = %task.id, completed = task.completed, "updated task");
        self.refresh_statistics(user_id)?;
        Ok(task)
    }

    /// Flip completion of a task.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::NotFound` if the task does not exist for this
    /// user, or a database error.
    pub fn toggle(&self, user_id: &str, id: &str) -> Result<Task, CadenceError> {
        let board = BoardState::new(vec![self.get(user_id, id)?]).toggle(id, self.clock.now());
        let task = board
            .tasks
            .into_iter()
            .next()
            .ok_or_else(|| CadenceError::NotFound(format!("task {id}")))?;
        self.save(user_id, task)
    }

    /// Delete a task. Instances of a deleted template are kept.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::NotFound` if the task does not exist for this user.
    pub fn delete(&self, user_id: &str, id: &str) -> Result<(), CadenceError> {
        self.db.in_transaction(|| {
            if !self.store().delete(user_id, id)? {
                return Err(CadenceError::NotFound(format!("task {id}")));
            }
            self.cache().invalidate(user_id)
        })?;

        tracing::info!(user = user_id, id, "deleted task");
        self.refresh_statistics(user_id)?;
        Ok(())
    }

    /// Delete every completed task. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a delete fails; nothing is removed in that case.
    pub fn clear_completed(&self, user_id: &str) -> Result<usize, CadenceError> {
        let board = BoardState::new(self.store().list(user_id)?);
        let (_, removed) = board.clear_completed();

        if removed.is_empty() {
            return Ok(0);
        }

        self.db.in_transaction(|| {
            let store = self.store();
            for id in &removed {
                store.delete(user_id, id)?;
            }
            self.cache().invalidate(user_id)
        })?;

        tracing::info!(user = user_id, removed = removed.len(), "cleared completed tasks");
        self.refresh_statistics(user_id)?;
        Ok(removed.len())
    }

    /// Tasks matching `query`, by due date ascending with undated tasks last.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self, user_id: &str, query: &TaskQuery) -> Result<Vec<Task>, CadenceError> {
        let tasks = query.apply(self.store().list(user_id)?);
        tracing::debug!(user = user_id, matched = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    /// Tasks due within a calendar month.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::Validation` for an invalid month.
    pub fn calendar(&self, user_id: &str, year: i32, month: u32) -> Result<Vec<Task>, CadenceError> {
        self.list(user_id, &TaskQuery::for_month(year, month)?)
    }

    /// The user's statistics snapshot, computed and cached on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache or task table cannot be read.
    pub fn statistics(&self, user_id: &str) -> Result<StatisticsSnapshot, CadenceError> {
        if let Some(snapshot) = self.cache().get(user_id)? {
            return Ok(snapshot);
        }
        tracing::debug!(user = user_id, "statistics cache miss");
        self.refresh_statistics(user_id)
    }

    /// Reminders that are due now. Each is marked notified and fires once.
    ///
    /// # Errors
    ///
    /// Returns an error if the tasks cannot be read or updated.
    pub fn due_reminders(&self, user_id: &str) -> Result<Vec<Task>, CadenceError> {
        let mut tasks = self.store().list(user_id)?;
        let fired = reminders::take_due(&mut tasks, self.clock.now());

        if !fired.is_empty() {
            self.db.in_transaction(|| {
                let store = self.store();
                for task in &fired {
                    store.update(task)?;
                }
                Ok(())
            })?;
            tracing::info!(user = user_id, fired = fired.len(), "reminders fired");
        }

        Ok(fired)
    }

    fn refresh_statistics(&self, user_id: &str) -> Result<StatisticsSnapshot, CadenceError> {
        let tasks = self.store().list(user_id)?;
        self.cache().refresh(user_id, &tasks, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedClock, MockClock};
    use crate::tasks::{Priority, RecurrenceKind, RecurrenceRule};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn service(db: &Database) -> TaskService<'_, FixedClock> {
        TaskService::with_clock(db, FixedClock(now()), TaskDefaults::default())
    }

    fn daily_until(days: i64) -> NewTask {
        let mut new_task = NewTask::titled("Standup");
        new_task.due_date = Some(now());
        new_task.recurrence = Some(RecurrenceRule {
            kind: RecurrenceKind::Daily,
            interval: 1,
            end_date: now() + Duration::days(days),
        });
        new_task
    }

    #[test]
    fn test_create_plain_task() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);

        let created = svc.create("alice", NewTask::titled("Buy milk")).unwrap();
        assert!(created.instances.is_empty());
        assert_eq!(created.task.category, "default");
        assert_eq!(created.task.priority, Priority::Medium);

        assert_eq!(svc.get("alice", &created.task.id).unwrap(), created.task);
        assert_eq!(svc.statistics("alice").unwrap().total_tasks, 1);
    }

    #[test]
    fn test_create_uses_configured_defaults() {
        let db = Database::open_in_memory().unwrap();
        let defaults = TaskDefaults {
            category: "inbox".to_string(),
            priority: Priority::High,
        };
        let svc = TaskService::with_clock(&db, FixedClock(now()), defaults);

        let created = svc.create("alice", NewTask::titled("Sort mail")).unwrap();
        assert_eq!(created.task.category, "inbox");
        assert_eq!(created.task.priority, Priority::High);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let db = Database::open_in_memory().unwrap();
        let err = service(&db).create("alice", NewTask::titled("  ")).unwrap_err();
        assert!(matches!(err, CadenceError::Validation(_)));
    }

    #[test]
    fn test_create_recurring_stores_template_and_instances() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);

        let created = svc.create("alice", daily_until(4)).unwrap();
        assert_eq!(created.instances.len(), 4);
        assert_eq!(
            created.task.recurrence.as_ref().unwrap().last_generated,
            Some(now())
        );

        let stored = svc.get("alice", &created.task.id).unwrap();
        assert_eq!(stored.recurrence.unwrap().last_generated, Some(now()));

        let instances = svc.instances("alice", &created.task.id).unwrap();
        assert_eq!(instances.len(), 4);
        assert!(instances
            .iter()
            .all(|t| t.parent_task_id.as_deref() == Some(created.task.id.as_str())));
        assert_eq!(svc.statistics("alice").unwrap().total_tasks, 5);
    }

    #[test]
    fn test_create_invalid_recurrence_stores_nothing() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);

        let mut new_task = daily_until(4);
        if let Some(rule) = new_task.recurrence.as_mut() {
            rule.interval = 0;
        }

        let err = svc.create("alice", new_task).unwrap_err();
        assert!(matches!(err, CadenceError::InvalidRecurrence(_)));
        assert!(svc.list("alice", &TaskQuery::new()).unwrap().is_empty());
    }

    #[test]
    fn test_create_with_empty_window_stamps_template() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);

        let created = svc.create("alice", daily_until(0)).unwrap();
        assert!(created.instances.is_empty());
        assert!(created.task.recurrence.unwrap().last_generated.is_some());
    }

    #[test]
    fn test_update_completion_sets_and_clears_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        let id = svc.create("alice", NewTask::titled("Write report")).unwrap().task.id;

        let done = svc.update("alice", &id, TaskPatch::completed(true)).unwrap();
        assert!(done.completed);
        assert_eq!(done.completed_at, Some(now()));
        assert_eq!(svc.statistics("alice").unwrap().completion_rate, 100);

        let reopened = svc.toggle("alice", &id).unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.completed_at, None);
        assert_eq!(svc.statistics("alice").unwrap().completion_rate, 0);
    }

    #[test]
    fn test_toggle_flips_and_keeps_statistics_current() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        let id = svc.create("alice", NewTask::titled("Water plants")).unwrap().task.id;

        let done = svc.toggle("alice", &id).unwrap();
        assert!(done.completed);
        assert_eq!(done.completed_at, Some(now()));
        assert!(svc.get("alice", &id).unwrap().completed);
        assert_eq!(svc.statistics("alice").unwrap().streak, 1);

        let reopened = svc.toggle("alice", &id).unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.completed_at, None);
        assert_eq!(svc.statistics("alice").unwrap().streak, 0);

        let err = svc.toggle("bob", &id).unwrap_err();
        assert!(matches!(err, CadenceError::NotFound(_)));
    }

    #[test]
    fn test_update_foreign_task_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        let id = svc.create("alice", NewTask::titled("Private")).unwrap().task.id;

        let err = svc.update("bob", &id, TaskPatch::completed(true)).unwrap_err();
        assert!(matches!(err, CadenceError::NotFound(_)));
        assert!(!svc.get("alice", &id).unwrap().completed);
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        let id = svc.create("alice", NewTask::titled("Temp")).unwrap().task.id;

        svc.delete("alice", &id).unwrap();
        assert!(matches!(svc.get("alice", &id), Err(CadenceError::NotFound(_))));
        assert!(matches!(svc.delete("alice", &id), Err(CadenceError::NotFound(_))));
        assert_eq!(svc.statistics("alice").unwrap().total_tasks, 0);
    }

    #[test]
    fn test_clear_completed() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        let a = svc.create("alice", NewTask::titled("A")).unwrap().task.id;
        svc.create("alice", NewTask::titled("B")).unwrap();
        svc.update("alice", &a, TaskPatch::completed(true)).unwrap();

        assert_eq!(svc.clear_completed("alice").unwrap(), 1);
        assert_eq!(svc.clear_completed("alice").unwrap(), 0);

        let remaining = svc.list("alice", &TaskQuery::new()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "B");
    }

    #[test]
    fn test_calendar_returns_month_only() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);

        let mut january = NewTask::titled("January");
        january.due_date = Some(Utc.with_ymd_and_hms(2024, 1, 31, 23, 0, 0).unwrap());
        let mut february = NewTask::titled("February");
        february.due_date = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        svc.create("alice", january).unwrap();
        svc.create("alice", february).unwrap();
        svc.create("alice", NewTask::titled("Undated")).unwrap();

        let tasks = svc.calendar("alice", 2024, 1).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "January");

        assert!(matches!(
            svc.calendar("alice", 2024, 13),
            Err(CadenceError::Validation(_))
        ));
    }

    #[test]
    fn test_statistics_recomputed_when_cache_missing() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        svc.create("alice", NewTask::titled("A")).unwrap();

        SnapshotCache::new(&db).invalidate("alice").unwrap();
        assert!(SnapshotCache::new(&db).get("alice").unwrap().is_none());

        assert_eq!(svc.statistics("alice").unwrap().total_tasks, 1);
        assert!(SnapshotCache::new(&db).get("alice").unwrap().is_some());
    }

    #[test]
    fn test_statistics_for_unknown_user_are_empty() {
        let db = Database::open_in_memory().unwrap();
        let snapshot = service(&db).statistics("nobody").unwrap();
        assert_eq!(snapshot, StatisticsSnapshot::empty(now()));
    }

    #[test]
    fn test_due_reminders_fire_once() {
        let db = Database::open_in_memory().unwrap();
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now());
        let svc = TaskService::with_clock(&db, clock, TaskDefaults::default());

        let mut due = NewTask::titled("Call dentist");
        due.reminder_at = Some(now() - Duration::minutes(5));
        let mut later = NewTask::titled("Water plants");
        later.reminder_at = Some(now() + Duration::hours(2));
        svc.create("alice", due).unwrap();
        svc.create("alice", later).unwrap();

        let fired = svc.due_reminders("alice").unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].title, "Call dentist");

        assert!(svc.due_reminders("alice").unwrap().is_empty());
    }

    #[test]
    fn test_users_are_isolated() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        svc.create("alice", NewTask::titled("Mine")).unwrap();

        assert!(svc.list("bob", &TaskQuery::new()).unwrap().is_empty());
        assert_eq!(svc.statistics("bob").unwrap().total_tasks, 0);
    }
}
