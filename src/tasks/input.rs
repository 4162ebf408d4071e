//! Inputs for creating and editing tasks.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Priority, Recurrence, RecurrenceKind, Reminder, Task, DEFAULT_CATEGORY};
use crate::error::CadenceError;

/// Values applied to new tasks that leave a field unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefaults {
    pub category: String,
    pub priority: Priority,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            priority: Priority::Medium,
        }
    }
}

/// A recurrence rule as supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub kind: RecurrenceKind,
    pub interval: i64,
    pub end_date: DateTime<Utc>,
}

/// Request to create a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub reminder_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub progress: Option<u8>,
}

impl NewTask {
    /// Start a request with just a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validate the request and build the task it describes.
    ///
    /// The recurrence rule itself is validated later, when the template is
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::Validation` if the title is blank or progress
    /// exceeds 100.
    pub fn into_task(
        self,
        id: String,
        user_id: &str,
        now: DateTime<Utc>,
        defaults: &TaskDefaults,
    ) -> Result<Task, CadenceError> {
        let title = validate_title(&self.title)?;
        let progress = validate_progress(self.progress.unwrap_or(0))?;

        let mut task = Task::new(id, user_id, title, now);
        task.description = self.description.filter(|d| !d.trim().is_empty());
        task.due_date = self.due_date;
        task.priority = self.priority.unwrap_or(defaults.priority);
        task.category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| defaults.category.clone());
        task.labels = self.labels;
        task.recurrence = self.recurrence.map(|rule| Recurrence {
            kind: rule.kind,
            interval: rule.interval,
            end_date: rule.end_date,
            last_generated: None,
        });
        task.reminder = self.reminder_at.map(Reminder::at);
        task.progress = progress;
        Ok(task)
    }
}

/// A partial update to an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub labels: Option<BTreeSet<String>>,
    pub reminder_at: Option<Option<DateTime<Utc>>>,
    pub progress: Option<u8>,
}

impl TaskPatch {
    /// Patch that only toggles completion.
    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to `task`.
    ///
    /// Nothing is modified when validation fails.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::Validation` if the new title is blank or the
    /// new progress exceeds 100.
    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) -> Result<(), CadenceError> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        let progress = self.progress.map(validate_progress).transpose()?;

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description.filter(|d| !d.trim().is_empty());
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.set_completed(completed, now);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = if category.trim().is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category
            };
        }
        if let Some(labels) = self.labels {
            task.labels = labels;
        }
        if let Some(reminder_at) = self.reminder_at {
            task.reminder = reminder_at.map(Reminder::at);
        }
        if let Some(progress) = progress {
            task.progress = progress;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String, CadenceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CadenceError::Validation("title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

fn validate_progress(progress: u8) -> Result<u8, CadenceError> {
    if progress > 100 {
        return Err(CadenceError::Validation(format!(
            "progress must be between 0 and 100, got {progress}"
        )));
    }
    Ok(progress)
}
