//! Statistics command implementation.

use crate::cli::args::OutputFormat;
use crate::core::Clock;
use crate::error::CadenceError;
use crate::features::stats::completions_per_day;
use crate::output::format_statistics;
use crate::service::TaskService;
use crate::tasks::TaskQuery;

/// Execute stats command.
///
/// # Errors
///
/// Returns an error if the snapshot or task list cannot be read.
pub fn stats<C: Clock>(
    svc: &TaskService<'_, C>,
    user: &str,
    days: usize,
    format: OutputFormat,
) -> Result<String, CadenceError> {
    let snapshot = svc.statistics(user)?;
    let tasks = svc.list(user, &TaskQuery::new())?;
    let recent = completions_per_day(&tasks, svc.now(), days);
    format_statistics(&snapshot, &recent, format)
}
