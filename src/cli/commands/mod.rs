//! Command implementations for cadence.
//!
//! Every command takes the task service, the acting user and the output
//! format, and returns the text to print.

mod add;
mod completions;
mod stats;

pub use add::add;
pub use completions::completions;
pub use stats::stats;

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, Utc};

use crate::cli::args::{EditArgs, ListArgs, OutputFormat};
use crate::core::{parse_date, parse_timestamp, Clock};
use crate::error::CadenceError;
use crate::features::board::BoardState;
use crate::output::{format_board, format_reminders, format_task, format_tasks, to_json};
use crate::service::TaskService;
use crate::tasks::{TaskPatch, TaskQuery};

/// Execute list command
///
/// # Errors
///
/// Returns an error if a filter is invalid or the query fails.
pub fn list<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    args: ListArgs,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let now = svc.now();

    let mut query = TaskQuery {
        category: args.category,
        priority: args.priority,
        completed: args.completed,
        labels: args.labels,
        ..TaskQuery::new()
    };

    if let (Some(from), Some(to)) = (args.from.as_deref(), args.to.as_deref()) {
        query.due_between = Some((parse_timestamp(from, now)?, end_of(to, now)?));
    }

    if let Some(pattern) = args.search.as_deref() {
        query = query.with_search(pattern)?;
    }

    let board = BoardState::new(svc.list(user, &query)?).with_filter(args.filter);
    format_board(&board, "Tasks", format)
}

/// Execute show command
///
/// # Errors
///
/// Returns `CadenceError::NotFound` if the task does not exist.
pub fn show<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    id: &str,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let task = svc.get(user, id)?;
    let instances = if task.is_recurring() {
        svc.instances(user, id)?
    } else {
        Vec::new()
    };
    format_task(&task, &instances, format)
}

/// Execute complete, reopen and toggle commands
///
/// `completed` of `None` flips the current state.
///
/// # Errors
///
/// Returns `CadenceError::NotFound` if the task does not exist.
pub fn set_completed<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    id: &str,
    completed: Option<bool>,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let task = match completed {
        Some(completed) => svc.update(user, id, TaskPatch::completed(completed))?,
        None => svc.toggle(user, id)?,
    };

    match format {
        OutputFormat::Json => to_json(&task),
        OutputFormat::Pretty => {
            let verb = if task.completed { "Completed" } else { "Reopened" };
            Ok(format!("{verb} task: {} (ID: {})", task.title, task.id))
        }
    }
}

/// Execute edit command
///
/// # Errors
///
/// Returns an error if nothing would change, a date cannot be parsed, the
/// task does not exist, or a field is invalid.
pub fn edit<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    args: EditArgs,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let id = args.id.clone();
    let patch = build_patch(args, svc.now())?;

    if patch.is_empty() {
        return Err(CadenceError::Validation(
            "nothing to change; pass at least one field to edit".to_string(),
        ));
    }

    let task = svc.update(user, &id, patch)?;
    match format {
        OutputFormat::Json => to_json(&task),
        OutputFormat::Pretty => Ok(format!("Updated task: {} (ID: {})", task.title, task.id)),
    }
}

fn build_patch(args: EditArgs, now: DateTime<Utc>) -> Result<TaskPatch, CadenceError> {
    let description = if args.clear_description {
        Some(None)
    } else {
        args.description.map(Some)
    };

    let due_date = if args.clear_due {
        Some(None)
    } else {
        args.due
            .as_deref()
            .map(|d| parse_timestamp(d, now))
            .transpose()?
            .map(Some)
    };

    let reminder_at = if args.clear_reminder {
        Some(None)
    } else {
        args.remind
            .as_deref()
            .map(|r| parse_timestamp(r, now))
            .transpose()?
            .map(Some)
    };

    let labels = if args.clear_labels {
        Some(BTreeSet::new())
    } else if args.labels.is_empty() {
        None
    } else {
        Some(labels(args.labels))
    };

    Ok(TaskPatch {
        title: args.title,
        description,
        due_date,
        completed: None,
        priority: args.priority,
        category: args.category,
        labels,
        reminder_at,
        progress: args.progress,
    })
}

/// Execute delete command
///
/// # Errors
///
/// Returns `CadenceError::NotFound` if the task does not exist.
pub fn delete<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    id: &str,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    svc.delete(user, id)?;
    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "deleted": id })),
        OutputFormat::Pretty => Ok(format!("Deleted task: {id}")),
    }
}

/// Execute clear-completed command
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn clear_completed<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let removed = svc.clear_completed(user)?;
    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "removed": removed })),
        OutputFormat::Pretty => {
            let plural = if removed == 1 { "" } else { "s" };
            Ok(format!("Removed {removed} completed task{plural}"))
        }
    }
}

/// Execute calendar command
///
/// # Errors
///
/// Returns `CadenceError::Validation` for an invalid month.
pub fn calendar<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    year: i32,
    month: u32,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let tasks = svc.calendar(user, year, month)?;
    format_tasks(&tasks, &format!("{year}-{month:02}"), format)
}

/// Execute reminders command
///
/// # Errors
///
/// Returns an error if the reminders cannot be read or marked.
pub fn reminders<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let fired = svc.due_reminders(user)?;
    format_reminders(&fired, format)
}

/// Normalize label arguments: trimmed, non-empty, deduplicated.
pub(crate) fn labels(raw: Vec<String>) -> BTreeSet<String> {
    raw.into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Upper bound of a date range: a bare date covers the whole day.
fn end_of(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, CadenceError> {
    match parse_date(input, now.date_naive()) {
        Some(date) => {
            let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
            Ok(date.and_time(last).and_utc())
        }
        None => parse_timestamp(input, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::storage::Database;
    use crate::tasks::{NewTask, TaskDefaults};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
    }

    fn service(db: &Database) -> TaskService<'_, FixedClock> {
        TaskService::with_clock(db, FixedClock(now()), TaskDefaults::default())
    }

    #[test]
    fn test_labels_normalized() {
        let set = labels(vec![" work ".to_string(), String::new(), "work".to_string()]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("work"));
    }

    #[test]
    fn test_end_of_date_covers_day() {
        let end = end_of("2024-01-31", now()).unwrap();
        assert_eq!(end.date_naive(), chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(end.time(), NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());

        let exact = end_of("2024-01-31 12:00", now()).unwrap();
        assert_eq!(exact, Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_build_patch_clears_fields() {
        let args = EditArgs {
            id: "t1".to_string(),
            clear_due: true,
            clear_description: true,
            clear_labels: true,
            ..EditArgs::default()
        };
        let patch = build_patch(args, now()).unwrap();
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.labels, Some(BTreeSet::new()));
        assert_eq!(patch.reminder_at, None);
    }

    #[test]
    fn test_build_patch_empty() {
        let args = EditArgs {
            id: "t1".to_string(),
            ..EditArgs::default()
        };
        assert!(build_patch(args, now()).unwrap().is_empty());
    }

    #[test]
    fn test_edit_without_changes_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        let id = svc.create("alice", NewTask::titled("A")).unwrap().task.id;

        let args = EditArgs {
            id,
            ..EditArgs::default()
        };
        assert!(matches!(
            edit(&svc, "alice", args, OutputFormat::Pretty),
            Err(CadenceError::Validation(_))
        ));
    }

    #[test]
    fn test_list_applies_board_filter() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        let id = svc.create("alice", NewTask::titled("Done")).unwrap().task.id;
        svc.create("alice", NewTask::titled("Open")).unwrap();
        svc.update("alice", &id, TaskPatch::completed(true)).unwrap();

        let args = ListArgs {
            filter: crate::features::board::BoardFilter::Active,
            ..ListArgs::default()
        };
        let output = list(&svc, "alice", args, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["title"], "Open");
        assert_eq!(value["itemsLeft"], 1);
    }

    #[test]
    fn test_list_invalid_search() {
        let db = Database::open_in_memory().unwrap();
        let args = ListArgs {
            search: Some("(unclosed".to_string()),
            ..ListArgs::default()
        };
        assert!(matches!(
            list(&service(&db), "alice", args, OutputFormat::Pretty),
            Err(CadenceError::Filter(_))
        ));
    }

    #[test]
    fn test_set_completed_and_toggle() {
        let db = Database::open_in_memory().unwrap();
        let svc = service(&db);
        let id = svc.create("alice", NewTask::titled("Report")).unwrap().task.id;

        let output = set_completed(&svc, "alice", &id, Some(true), OutputFormat::Pretty).unwrap();
        assert!(output.starts_with("Completed task: Report"));

        let output = set_completed(&svc, "alice", &id, None, OutputFormat::Pretty).unwrap();
        assert!(output.starts_with("Reopened task: Report"));
    }

    #[test]
    fn test_delete_missing_task() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            delete(&service(&db), "alice", "nope", OutputFormat::Pretty),
            Err(CadenceError::NotFound(_))
        ));
    }

    #[test]
    fn test_clear_completed_message() {
        let db = Database::open_in_memory().unwrap();
        let output = clear_completed(&service(&db), "alice", OutputFormat::Pretty).unwrap();
        assert_eq!(output, "Removed 0 completed tasks");
    }
}
