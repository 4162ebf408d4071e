//! Reminder sweep.
//!
//! Picks out open tasks whose reminder time has passed and marks each
//! reminder as sent so it fires only once.

use chrono::{DateTime, Utc};

use crate::tasks::Task;

/// Mark every due reminder in `tasks` as notified and return the affected tasks.
///
/// A reminder is due when it is enabled, unsent, its time is at or before
/// `now`, and the task is still open.
pub fn take_due(tasks: &mut [Task], now: DateTime<Utc>) -> Vec<Task> {
    let mut fired = Vec::new();

    for task in tasks.iter_mut().filter(|t| !t.completed) {
        if let Some(reminder) = task.reminder.as_mut() {
            if reminder.is_due(now) {
                reminder.notified = true;
                fired.push(task.clone());
            }
        }
    }

    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Reminder;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn with_reminder(id: &str, offset_minutes: i64) -> Task {
        let mut task = Task::new(id, "alice", id, now() - Duration::days(1));
        task.reminder = Some(Reminder::at(now() + Duration::minutes(offset_minutes)));
        task
    }

    #[test]
    fn test_take_due_fires_once() {
        let mut tasks = vec![with_reminder("past", -5), with_reminder("future", 30)];

        let fired = take_due(&mut tasks, now());
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, "past");
        assert!(fired[0].reminder.as_ref().unwrap().notified);
        assert!(tasks[0].reminder.as_ref().unwrap().notified);
        assert!(!tasks[1].reminder.as_ref().unwrap().notified);

        assert!(take_due(&mut tasks, now()).is_empty());
    }

    #[test]
    fn test_take_due_skips_completed_tasks() {
        let mut done = with_reminder("done", -5);
        done.set_completed(true, now());
        let mut tasks = vec![done];

        assert!(take_due(&mut tasks, now()).is_empty());
        assert!(!tasks[0].reminder.as_ref().unwrap().notified);
    }

    #[test]
    fn test_take_due_ignores_tasks_without_reminders() {
        let mut tasks = vec![Task::new("plain", "alice", "Plain", now())];
        assert!(take_due(&mut tasks, now()).is_empty());
    }
}
