//! JSON output formatting for cadence.
//!
//! Field names follow the task wire format (`camelCase`).

use serde::Serialize;
use serde_json::json;

use crate::error::CadenceError;
use crate::features::board::BoardState;
use crate::features::stats::StatisticsSnapshot;
use crate::service::Created;
use crate::tasks::Task;

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task], list_name: &str) -> Result<String, CadenceError> {
    let output = json!({
        "list": list_name,
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a board as JSON
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_board_json(board: &BoardState, list_name: &str) -> Result<String, CadenceError> {
    let visible = board.visible();
    let output = json!({
        "list": list_name,
        "filter": board.filter,
        "count": visible.len(),
        "itemsLeft": board.items_left(),
        "items": visible
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a single task and its generated instances as JSON
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_task_json(task: &Task, instances: &[Task]) -> Result<String, CadenceError> {
    if task.is_recurring() {
        let ids: Vec<&str> = instances.iter().map(|t| t.id.as_str()).collect();
        let mut value = serde_json::to_value(task)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("instanceIds".to_string(), json!(ids));
        }
        return Ok(serde_json::to_string_pretty(&value)?);
    }
    Ok(serde_json::to_string_pretty(task)?)
}

/// Format a creation result as JSON
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_created_json(created: &Created) -> Result<String, CadenceError> {
    Ok(serde_json::to_string_pretty(created)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsReport<'a> {
    #[serde(flatten)]
    snapshot: &'a StatisticsSnapshot,
    recent_completions: &'a [usize],
}

/// Format a statistics snapshot as JSON, with daily completions oldest first
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn format_statistics_json(
    snapshot: &StatisticsSnapshot,
    recent: &[usize],
) -> Result<String, CadenceError> {
    Ok(serde_json::to_string_pretty(&StatisticsReport {
        snapshot,
        recent_completions: recent,
    })?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `CadenceError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, CadenceError> {
    Ok(serde_json::to_string_pretty(value)?)
}
