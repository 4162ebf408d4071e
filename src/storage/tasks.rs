//! Task persistence.
//!
//! Labels, recurrence rules and reminders are stored as JSON text columns;
//! timestamps as RFC 3339 strings.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::CadenceError;
use crate::tasks::{Priority, Recurrence, Reminder, Task};

const TASK_COLUMNS: &str = "id, user_id, title, description, due_date, completed, completed_at,
     priority, category, labels, recurrence, reminder, progress, parent_task_id, created_at";

/// Stores tasks for all users. Every read and write is scoped to one user.
pub struct TaskStore<'a> {
    db: &'a Database,
}

impl<'a> TaskStore<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be serialized or saved.
    pub fn insert(&self, task: &Task) -> Result<(), CadenceError> {
        let row = TaskRow::from_task(task)?;

        self.db
            .connection()
            .execute(
                &format!(
                    "INSERT INTO tasks ({TASK_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
                ),
                params![
                    row.id,
                    row.user_id,
                    row.title,
                    row.description,
                    row.due_date,
                    row.completed,
                    row.completed_at,
                    row.priority,
                    row.category,
                    row.labels,
                    row.recurrence,
                    row.reminder,
                    row.progress,
                    row.parent_task_id,
                    row.created_at,
                ],
            )
            .map_err(|e| CadenceError::Database(format!("Failed to insert task {}: {e}", task.id)))?;

        Ok(())
    }

    /// Insert several tasks. Callers wanting all-or-nothing wrap this in
    /// [`Database::in_transaction`].
    ///
    /// # Errors
    ///
    /// Returns an error on the first task that cannot be saved.
    pub fn insert_many(&self, tasks: &[Task]) -> Result<(), CadenceError> {
        for task in tasks {
            self.insert(task)?;
        }
        Ok(())
    }

    /// Overwrite a stored task. Returns `false` if no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update(&self, task: &Task) -> Result<bool, CadenceError> {
        let row = TaskRow::from_task(task)?;

        let changed = self
            .db
            .connection()
            .execute(
                r"UPDATE tasks SET
                  title = ?3,
                  description = ?4,
                  due_date = ?5,
                  completed = ?6,
                  completed_at = ?7,
                  priority = ?8,
                  category = ?9,
                  labels = ?10,
                  recurrence = ?11,
                  reminder = ?12,
                  progress = ?13,
                  parent_task_id = ?14
                  WHERE id = ?1 AND user_id = ?2",
                params![
                    row.id,
                    row.user_id,
                    row.title,
                    row.description,
                    row.due_date,
                    row.completed,
                    row.completed_at,
                    row.priority,
                    row.category,
                    row.labels,
                    row.recurrence,
                    row.reminder,
                    row.progress,
                    row.parent_task_id,
                ],
            )
            .map_err(|e| CadenceError::Database(format!("Failed to update task {}: {e}", task.id)))?;

        Ok(changed > 0)
    }

    /// Delete a task. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, user_id: &str, id: &str) -> Result<bool, CadenceError> {
        let changed = self
            .db
            .connection()
            .execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .map_err(|e| CadenceError::Database(format!("Failed to delete task {id}: {e}")))?;

        Ok(changed > 0)
    }

    /// Fetch one task.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed.
    pub fn get(&self, user_id: &str, id: &str) -> Result<Option<Task>, CadenceError> {
        let row = self
            .db
            .connection()
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"),
                params![id, user_id],
                TaskRow::from_row,
            )
            .optional()
            .map_err(|e| CadenceError::Database(format!("Failed to query task {id}: {e}")))?;

        row.map(TaskRow::into_task).transpose()
    }

    /// Fetch every task a user owns, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is malformed.
    pub fn list(&self, user_id: &str) -> Result<Vec<Task>, CadenceError> {
        self.query_many(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY rowid ASC"),
            &[&user_id],
        )
    }

    /// Fetch the instances generated from a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is malformed.
    pub fn instances_of(&self, user_id: &str, template_id: &str) -> Result<Vec<Task>, CadenceError> {
        self.query_many(
            &format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE user_id = ?1 AND parent_task_id = ?2
                 ORDER BY due_date ASC"
            ),
            &[&user_id, &template_id],
        )
    }

    fn query_many(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Task>, CadenceError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| CadenceError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(args, TaskRow::from_row)
            .map_err(|e| CadenceError::Database(format!("Failed to query tasks: {e}")))?;

        let mut tasks = Vec::new();
        for row in rows {
            let row = row.map_err(|e| CadenceError::Database(e.to_string()))?;
            tasks.push(row.into_task()?);
        }

        Ok(tasks)
    }
}

/// A task as it is laid out in the `tasks` table.
struct TaskRow {
    id: String,
    user_id: String,
    title: String,
    description: Option<String>,
    due_date: Option<String>,
    completed: bool,
    completed_at: Option<String>,
    priority: String,
    category: String,
    labels: String,
    recurrence: Option<String>,
    reminder: Option<String>,
    progress: u8,
    parent_task_id: Option<String>,
    created_at: String,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            due_date: row.get(4)?,
            completed: row.get(5)?,
            completed_at: row.get(6)?,
            priority: row.get(7)?,
            category: row.get(8)?,
            labels: row.get(9)?,
            recurrence: row.get(10)?,
            reminder: row.get(11)?,
            progress: row.get(12)?,
            parent_task_id: row.get(13)?,
            created_at: row.get(14)?,
        })
    }

    fn from_task(task: &Task) -> Result<Self, CadenceError> {
        Ok(Self {
            id: task.id.clone(),
            user_id: task.user_id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.map(format_timestamp),
            completed: task.completed,
            completed_at: task.completed_at.map(format_timestamp),
            priority: task.priority.to_string(),
            category: task.category.clone(),
            labels: serde_json::to_string(&task.labels)?,
            recurrence: task.recurrence.as_ref().map(serde_json::to_string).transpose()?,
            reminder: task.reminder.as_ref().map(serde_json::to_string).transpose()?,
            progress: task.progress,
            parent_task_id: task.parent_task_id.clone(),
            created_at: format_timestamp(task.created_at),
        })
    }

    fn into_task(self) -> Result<Task, CadenceError> {
        let labels: BTreeSet<String> = serde_json::from_str(&self.labels)?;
        let recurrence: Option<Recurrence> =
            self.recurrence.as_deref().map(serde_json::from_str).transpose()?;
        let reminder: Option<Reminder> =
            self.reminder.as_deref().map(serde_json::from_str).transpose()?;
        let priority: Priority = self.priority.parse()?;

        Ok(Task {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            due_date: self.due_date.as_deref().map(parse_timestamp).transpose()?,
            completed: self.completed,
            completed_at: self.completed_at.as_deref().map(parse_timestamp).transpose()?,
            priority,
            category: self.category,
            labels,
            recurrence,
            reminder,
            progress: self.progress,
            parent_task_id: self.parent_task_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

pub(super) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(super) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, CadenceError> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| CadenceError::Parse(format!("Invalid stored timestamp '{s}': {e}")))
}
