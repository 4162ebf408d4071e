//! List view state.
//!
//! [`BoardState`] holds the tasks on screen and the active filter. Every
//! update takes the state by value and returns the next state, so callers
//! own the state explicitly and re-render from whatever comes back.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::tasks::Task;

/// Which tasks a board shows.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardFilter {
    /// Every task.
    #[default]
    All,
    /// Open tasks only.
    Active,
    /// Completed tasks only.
    Completed,
}

impl BoardFilter {
    #[must_use]
    pub const fn admits(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub filter: BoardFilter,
}

impl BoardState {
    #[must_use]
    pub const fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            filter: BoardFilter::All,
        }
    }

    #[must_use]
    pub fn with_filter(self, filter: BoardFilter) -> Self {
        Self { filter, ..self }
    }

    /// Tasks admitted by the current filter, in board order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.admits(t)).collect()
    }

    /// Number of open tasks, regardless of filter.
    #[must_use]
    pub fn items_left(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// "1 item left", "3 items left".
    #[must_use]
    pub fn items_left_label(&self) -> String {
        let count = self.items_left();
        let plural = if count == 1 { "" } else { "s" };
        format!("{count} item{plural} left")
    }

    /// Flip completion of the task with `id`. Unknown ids leave the state unchanged.
    #[must_use]
    pub fn toggle(mut self, id: &str, now: DateTime<Utc>) -> Self {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            let completed = !task.completed;
            task.set_completed(completed, now);
        }
        self
    }

    /// Drop the task with `id`.
    #[must_use]
    pub fn remove(mut self, id: &str) -> Self {
        self.tasks.retain(|t| t.id != id);
        self
    }

    /// Drop every completed task, returning the new state and the removed ids.
    #[must_use]
    pub fn clear_completed(self) -> (Self, Vec<String>) {
        let (completed, open): (Vec<Task>, Vec<Task>) =
            self.tasks.into_iter().partition(|t| t.completed);
        let removed = completed.into_iter().map(|t| t.id).collect();
        (
            Self {
                tasks: open,
                filter: self.filter,
            },
            removed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn board() -> BoardState {
        let mut done = Task::new("done", "alice", "Done", now());
        done.set_completed(true, now());
        BoardState::new(vec![
            Task::new("a", "alice", "First", now()),
            done,
            Task::new("b", "alice", "Second", now()),
        ])
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_filters() {
        let state = board();
        assert_eq!(state.visible().len(), 3);

        let state = state.with_filter(BoardFilter::Active);
        assert_eq!(ids(&state.visible()), vec!["a", "b"]);

        let state = state.with_filter(BoardFilter::Completed);
        assert_eq!(ids(&state.visible()), vec!["done"]);
    }

    #[test]
    fn test_items_left_label() {
        let state = board();
        assert_eq!(state.items_left(), 2);
        assert_eq!(state.items_left_label(), "2 items left");

        let state = state.remove("a");
        assert_eq!(state.items_left_label(), "1 item left");

        assert_eq!(BoardState::default().items_left_label(), "0 items left");
    }

    #[test]
    fn test_toggle() {
        let state = board().toggle("a", now());
        assert!(state.tasks[0].completed);
        assert_eq!(state.tasks[0].completed_at, Some(now()));

        let state = state.toggle("a", now());
        assert!(!state.tasks[0].completed);
        assert!(state.tasks[0].completed_at.is_none());

        let unchanged = board().toggle("missing", now());
        assert_eq!(unchanged, board());
    }

    #[test]
    fn test_clear_completed_keeps_filter() {
        let (state, removed) = board().with_filter(BoardFilter::Active).clear_completed();
        assert_eq!(removed, vec!["done"]);
        assert_eq!(state.tasks.len(), 2);
        assert_eq!(state.filter, BoardFilter::Active);
    }
}
