//! Output formatting for cadence.
//!
//! This module provides formatters for displaying tasks and statistics in
//! various formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::CadenceError;
use crate::features::board::BoardState;
use crate::features::stats::StatisticsSnapshot;
use crate::service::Created;
use crate::tasks::Task;

pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_tasks(tasks: &[Task], title: &str, format: OutputFormat) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, title)),
        OutputFormat::Json => format_tasks_json(tasks, title),
    }
}

/// Format a board based on output format
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_board(board: &BoardState, title: &str, format: OutputFormat) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_board_pretty(board, title)),
        OutputFormat::Json => format_board_json(board, title),
    }
}

/// Format a single task based on output format
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_task(task: &Task, instances: &[Task], format: OutputFormat) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_task_pretty(task, instances)),
        OutputFormat::Json => format_task_json(task, instances),
    }
}

/// Format a creation result based on output format
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_created(created: &Created, format: OutputFormat) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_created_pretty(created)),
        OutputFormat::Json => format_created_json(created),
    }
}

/// Format statistics based on output format
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_statistics(
    snapshot: &StatisticsSnapshot,
    recent: &[usize],
    format: OutputFormat,
) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_statistics_pretty(snapshot, recent)),
        OutputFormat::Json => format_statistics_json(snapshot, recent),
    }
}

/// Format fired reminders based on output format
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_reminders(tasks: &[Task], format: OutputFormat) -> Result<String, CadenceError> {
    match format {
        OutputFormat::Pretty => Ok(format_reminders_pretty(tasks)),
        OutputFormat::Json => format_tasks_json(tasks, "Reminders"),
    }
}
