//! Add command implementation.
//!
//! This module implements `cadence add`, including recurring templates.

use crate::cli::args::{AddArgs, OutputFormat};
use crate::core::{parse_timestamp, Clock};
use crate::error::CadenceError;
use crate::output::format_created;
use crate::service::TaskService;
use crate::tasks::{NewTask, RecurrenceRule};

use super::labels;

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if a date cannot be parsed, the task is invalid, the
/// recurrence rule is unusable, or the database write fails.
pub fn add<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    args: AddArgs,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let new_task = build_new_task(args, svc.now())?;
    let created = svc.create(user, new_task)?;
    format_created(&created, format)
}

fn build_new_task(
    args: AddArgs,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<NewTask, CadenceError> {
    let due_date = args
        .due
        .as_deref()
        .map(|d| parse_timestamp(d, now))
        .transpose()?;

    let recurrence = match (args.repeat, args.until.as_deref()) {
        (Some(kind), Some(until)) => Some(RecurrenceRule {
            kind,
            interval: args.every,
            end_date: parse_timestamp(until, now)?,
        }),
        (Some(kind), None) => {
            return Err(CadenceError::InvalidRecurrence(format!(
                "--repeat {kind} needs an end date (--until)"
            )))
        }
        (None, _) => None,
    };

    Ok(NewTask {
        title: args.title,
        description: args.description,
        due_date,
        priority: args.priority,
        category: args.category,
        labels: labels(args.labels),
        recurrence,
        reminder_at: args
            .remind
            .as_deref()
            .map(|r| parse_timestamp(r, now))
            .transpose()?,
        progress: args.progress,
    })
}
