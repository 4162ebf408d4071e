//! Materializes the instances of a recurring template.
//!
//! Occurrences step forward from the template's due date by a fixed number
//! of days (`kind.step_days() * interval`). At most [`MAX_INSTANCES`] are
//! produced per call, and stepping stops at the first candidate past the
//! rule's end date.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::CadenceError;
use crate::tasks::Task;

/// Upper bound on instances generated by a single expansion.
pub const MAX_INSTANCES: i64 = 90;

/// Generate the instances for `template` and stamp its `last_generated`.
///
/// Every instance is a copy of the template with a fresh id, its own due
/// date, `parent_task_id` pointing at the template, and completion and
/// reminder state reset. An end date on or before the due date yields no
/// instances but still stamps the template.
///
/// Calling this twice on the same template produces two full batches; the
/// caller decides whether re-expansion is wanted.
///
/// # Errors
///
/// Returns `CadenceError::InvalidRecurrence` if the template has no rule,
/// the rule's kind is `none`, the interval is not positive, or the template
/// has no due date. The template is not modified on error.
pub fn expand(template: &mut Task, now: DateTime<Utc>) -> Result<Vec<Task>, CadenceError> {
    let due_dates = occurrence_dates(template)?;

    let instances: Vec<Task> = due_dates
        .into_iter()
        .map(|due| instantiate(template, due, now))
        .collect();

    if let Some(recurrence) = template.recurrence.as_mut() {
        recurrence.last_generated = Some(now);
    }

    tracing::debug!(
        template = %template.id,
        instances = instances.len(),
        "expanded recurring task"
    );

    Ok(instances)
}

/// Compute the due dates `expand` would emit, without building tasks.
///
/// # Errors
///
/// Same conditions as [`expand`].
fn occurrence_dates(template: &Task) -> Result<Vec<DateTime<Utc>>, CadenceError> {
    let recurrence = template.recurrence.as_ref().ok_or_else(|| {
        CadenceError::InvalidRecurrence(format!("task {} has no recurrence rule", template.id))
    })?;

    let step = recurrence.kind.step_days().ok_or_else(|| {
        CadenceError::InvalidRecurrence(format!(
            "task {} has recurrence kind '{}'",
            template.id, recurrence.kind
        ))
    })?;

    if recurrence.interval <= 0 {
        return Err(CadenceError::InvalidRecurrence(format!(
            "interval must be positive, got {}",
            recurrence.interval
        )));
    }

    let due = template.due_date.ok_or_else(|| {
        CadenceError::InvalidRecurrence(format!("recurring task {} has no due date", template.id))
    })?;

    let span_days = (recurrence.end_date - due).num_days();
    let count = span_days.min(MAX_INSTANCES);
    let stride = step.checked_mul(recurrence.interval);

    let mut dates = Vec::new();
    for i in 1..=count {
        // Overflow is treated like any other overshoot
        let candidate = stride
            .and_then(|s| i.checked_mul(s))
            .and_then(Duration::try_days)
            .and_then(|offset| due.checked_add_signed(offset));

        match candidate {
            Some(date) if date <= recurrence.end_date => dates.push(date),
            _ => break,
        }
    }

    Ok(dates)
}

fn instantiate(template: &Task, due: DateTime<Utc>, now: DateTime<Utc>) -> Task {
    let mut instance = template.clone();
    instance.id = Uuid::new_v4().to_string();
    instance.due_date = Some(due);
    instance.parent_task_id = Some(template.id.clone());
    instance.completed = false;
    instance.completed_at = None;
    instance.created_at = now;
    if let Some(reminder) = instance.reminder.as_mut() {
        reminder.notified = false;
    }
    if let Some(recurrence) = instance.recurrence.as_mut() {
        recurrence.last_generated = None;
    }
    instance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{Recurrence, RecurrenceKind, Reminder};
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 31, 20, 0, 0).unwrap()
    }

    fn template(kind: RecurrenceKind, interval: i64, due: DateTime<Utc>, end: DateTime<Utc>) -> Task {
        let mut task = Task::new("template-1", "alice", "Water plants", now());
        task.due_date = Some(due);
        task.category = "home".to_string();
        task.labels.insert("chores".to_string());
        task.recurrence = Some(Recurrence {
            kind,
            interval,
            end_date: end,
            last_generated: None,
        });
        task
    }

    #[test]
    fn test_daily_window_is_inclusive_of_end_date() {
        let mut task = template(RecurrenceKind::Daily, 1, date(2024, 1, 1), date(2024, 1, 5));

        let instances = expand(&mut task, now()).unwrap();

        let dues: Vec<_> = instances.iter().map(|t| t.due_date.unwrap()).collect();
        assert_eq!(
            dues,
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4), date(2024, 1, 5)]
        );
    }

    #[test]
    fn test_instances_link_to_template_and_reset_state() {
        let mut task = template(RecurrenceKind::Daily, 1, date(2024, 1, 1), date(2024, 1, 4));
        task.set_completed(true, now());
        task.reminder = Some(Reminder {
            notified: true,
            ..Reminder::at(date(2024, 1, 1))
        });

        let instances = expand(&mut task, now()).unwrap();
        assert_eq!(instances.len(), 3);

        for instance in &instances {
            assert_eq!(instance.parent_task_id.as_deref(), Some("template-1"));
            assert!(!instance.completed);
            assert!(instance.completed_at.is_none());
            assert!(!instance.reminder.as_ref().unwrap().notified);
            assert_ne!(instance.id, task.id);
            assert_eq!(instance.title, "Water plants");
            assert_eq!(instance.category, "home");
            assert!(instance.labels.contains("chores"));
            assert!(instance.recurrence.as_ref().unwrap().last_generated.is_none());
        }

        let ids: HashSet<_> = instances.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), instances.len());
    }

    #[test]
    fn test_stamps_last_generated() {
        let mut task = template(RecurrenceKind::Weekly, 1, date(2024, 1, 1), date(2024, 2, 1));
        expand(&mut task, now()).unwrap();
        assert_eq!(task.recurrence.unwrap().last_generated, Some(now()));
    }

    #[test]
    fn test_caps_at_ninety_instances() {
        let mut task = template(RecurrenceKind::Daily, 1, date(2024, 1, 1), date(2025, 6, 1));

        let instances = expand(&mut task, now()).unwrap();

        assert_eq!(instances.len(), 90);
        assert_eq!(instances.last().unwrap().due_date, Some(date(2024, 3, 31)));
    }

    #[test]
    fn test_interval_multiplies_step() {
        // 30-day window, every two weeks: day 14 and day 28
        let mut task = template(RecurrenceKind::Weekly, 2, date(2024, 1, 1), date(2024, 1, 31));

        let dues: Vec<_> = expand(&mut task, now())
            .unwrap()
            .iter()
            .map(|t| t.due_date.unwrap())
            .collect();

        assert_eq!(dues, vec![date(2024, 1, 15), date(2024, 1, 29)]);
    }

    #[test]
    fn test_monthly_uses_fixed_thirty_days() {
        let mut task = template(RecurrenceKind::Monthly, 1, date(2024, 1, 31), date(2024, 4, 30));

        let dues: Vec<_> = expand(&mut task, now())
            .unwrap()
            .iter()
            .map(|t| t.due_date.unwrap())
            .collect();

        assert_eq!(dues, vec![date(2024, 3, 1), date(2024, 3, 31), date(2024, 4, 30)]);
    }

    #[test]
    fn test_yearly_outside_window_is_empty() {
        let mut task = template(RecurrenceKind::Yearly, 1, date(2024, 1, 1), date(2024, 12, 1));
        assert!(expand(&mut task, now()).unwrap().is_empty());
    }

    #[test]
    fn test_every_due_date_within_end_date() {
        let end = date(2024, 7, 4);
        for (kind, interval) in [
            (RecurrenceKind::Daily, 3),
            (RecurrenceKind::Weekly, 1),
            (RecurrenceKind::Monthly, 2),
        ] {
            let mut task = template(kind, interval, date(2024, 1, 1), end);
            let instances = expand(&mut task, now()).unwrap();
            assert!(instances.len() <= 90);
            assert!(instances.iter().all(|t| t.due_date.unwrap() <= end));
        }
    }

    #[test]
    fn test_end_before_due_yields_nothing() {
        let mut task = template(RecurrenceKind::Daily, 1, date(2024, 1, 5), date(2024, 1, 1));
        assert!(expand(&mut task, now()).unwrap().is_empty());

        let mut same_day = template(RecurrenceKind::Daily, 1, date(2024, 1, 5), date(2024, 1, 5));
        assert!(expand(&mut same_day, now()).unwrap().is_empty());
        assert_eq!(same_day.recurrence.unwrap().last_generated, Some(now()));
    }

    #[test]
    fn test_non_positive_interval_is_rejected() {
        for interval in [0, -3] {
            let mut task = template(RecurrenceKind::Daily, interval, date(2024, 1, 1), date(2024, 1, 5));
            let before = task.clone();

            let err = expand(&mut task, now()).unwrap_err();

            assert!(matches!(err, CadenceError::InvalidRecurrence(_)));
            assert_eq!(task, before);
        }
    }

    #[test]
    fn test_kind_none_is_rejected() {
        let mut task = template(RecurrenceKind::None, 1, date(2024, 1, 1), date(2024, 1, 5));
        assert!(matches!(
            expand(&mut task, now()),
            Err(CadenceError::InvalidRecurrence(_))
        ));
        assert!(task.recurrence.unwrap().last_generated.is_none());
    }

    #[test]
    fn test_missing_due_date_or_rule_is_rejected() {
        let mut undated = template(RecurrenceKind::Daily, 1, date(2024, 1, 1), date(2024, 1, 5));
        undated.due_date = None;
        assert!(expand(&mut undated, now()).is_err());

        let mut plain = Task::new("t", "alice", "Plain", now());
        assert!(expand(&mut plain, now()).is_err());
    }

    #[test]
    fn test_huge_interval_does_not_overflow() {
        let mut task = template(RecurrenceKind::Yearly, i64::MAX, date(2024, 1, 1), date(2024, 6, 1));
        assert!(expand(&mut task, now()).unwrap().is_empty());
    }

    #[test]
    fn test_expanding_twice_duplicates_batches() {
        let mut task = template(RecurrenceKind::Daily, 1, date(2024, 1, 1), date(2024, 1, 5));

        let first = expand(&mut task, now()).unwrap();
        let second = expand(&mut task, now()).unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        let first_dues: Vec<_> = first.iter().map(|t| t.due_date).collect();
        let second_dues: Vec<_> = second.iter().map(|t| t.due_date).collect();
        assert_eq!(first_dues, second_dues);
        assert!(first.iter().zip(&second).all(|(a, b)| a.id != b.id));
    }
}
