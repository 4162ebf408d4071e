//! Per-user statistics snapshot.
//!
//! A snapshot is derived entirely from the user's task list. It is never
//! patched; every task mutation produces a fresh one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::streak::current_streak;
use crate::tasks::Task;

/// Aggregate statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    /// Percentage of tasks completed, rounded to the nearest integer (0-100)
    pub completion_rate: u32,
    /// Number of tasks
    pub total_tasks: usize,
    /// Number of completed tasks
    pub completed_tasks: usize,
    /// Task count per category
    pub category_distribution: BTreeMap<String, usize>,
    /// Consecutive days with a completion, ending today
    pub streak: usize,
    /// When this snapshot was computed
    pub last_updated: DateTime<Utc>,
}

impl StatisticsSnapshot {
    /// Snapshot of a user with no tasks.
    #[must_use]
    pub const fn empty(as_of: DateTime<Utc>) -> Self {
        Self {
            completion_rate: 0,
            total_tasks: 0,
            completed_tasks: 0,
            category_distribution: BTreeMap::new(),
            streak: 0,
            last_updated: as_of,
        }
    }

    /// Compute statistics over a user's full task list.
    #[must_use]
    pub fn compute(tasks: &[Task], as_of: DateTime<Utc>) -> Self {
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|t| t.completed).count();

        let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for task in tasks {
            *category_distribution
                .entry(task.category_or_default().to_string())
                .or_default() += 1;
        }

        Self {
            completion_rate: completion_rate(completed_tasks, total_tasks),
            total_tasks,
            completed_tasks,
            category_distribution,
            streak: current_streak(tasks, as_of),
            last_updated: as_of,
        }
    }

    /// Number of tasks not yet completed.
    #[must_use]
    pub const fn open_tasks(&self) -> usize {
        self.total_tasks - self.completed_tasks
    }
}

/// `completed / total` as a whole percentage, rounding halves up.
fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = (completed * 100 + total / 2) / total;
    u32::try_from(percent).unwrap_or(100)
}
