//! Filtering for task listings.
//!
//! A [`TaskQuery`] is a conjunction of optional conditions; an empty query
//! matches every task.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::{Regex, RegexBuilder};

use super::types::{Priority, Task};
use crate::error::CadenceError;

#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// Inclusive due-date window. Tasks without a due date never match.
    pub due_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    /// Matches when the task carries any of these labels.
    pub labels: Vec<String>,
    /// Case-insensitive pattern over title and description.
    pub search: Option<Regex>,
}

impl TaskQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to tasks due within the given calendar month.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::Validation` for an out-of-range month.
    pub fn for_month(year: i32, month: u32) -> Result<Self, CadenceError> {
        let (start, end) = month_bounds(year, month)?;
        Ok(Self {
            due_between: Some((start, end)),
            ..Self::default()
        })
    }

    /// Add a search pattern.
    ///
    /// # Errors
    ///
    /// Returns `CadenceError::Filter` if the pattern is not a valid regex.
    pub fn with_search(mut self, pattern: &str) -> Result<Self, CadenceError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| CadenceError::Filter(format!("invalid search pattern '{pattern}': {e}")))?;
        self.search = Some(regex);
        Ok(self)
    }

    /// Check a single task against every condition.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some((start, end)) = self.due_between {
            if !task.due_date.is_some_and(|due| due >= start && due <= end) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if task.category_or_default() != category {
                return false;
            }
        }

        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }

        if self.completed.is_some_and(|c| c != task.completed) {
            return false;
        }

        if !self.labels.is_empty() && !self.labels.iter().any(|l| task.labels.contains(l)) {
            return false;
        }

        if let Some(search) = &self.search {
            let in_title = search.is_match(&task.title);
            let in_description = task
                .description
                .as_deref()
                .is_some_and(|d| search.is_match(d));
            if !in_title && !in_description {
                return false;
            }
        }

        true
    }

    /// Filter and sort tasks by due date (undated tasks last).
    #[must_use]
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        let mut matched: Vec<Task> = tasks.into_iter().filter(|t| self.matches(t)).collect();
        sort_by_due(&mut matched);
        matched
    }
}

/// Sort tasks by due date ascending; undated tasks go last, ties by creation.
pub fn sort_by_due(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.created_at.cmp(&b.created_at)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    });
}

/// First and last instant of a calendar month in UTC.
fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), CadenceError> {
    let invalid = || CadenceError::Validation(format!("invalid month {year}-{month:02}"));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    let start = first.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc();
    let end = next.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc() - Duration::milliseconds(1);
    Ok((start, end))
}
