//! Daily completion streaks.

use chrono::{DateTime, NaiveDate, Utc};

use crate::tasks::Task;

/// Count consecutive days, ending on `as_of`'s day, with at least one completion.
///
/// Completions are compared by UTC calendar day. Walking completions from
/// newest to oldest, a completion `streak` days before `as_of` extends the
/// run; one on a day already counted (or in the future) is skipped; anything
/// older ends the run. The run must start on `as_of` itself, so a user whose
/// latest completion was yesterday has a streak of 0.
#[must_use]
pub fn current_streak(tasks: &[Task], as_of: DateTime<Utc>) -> usize {
    let today = as_of.date_naive();

    let mut days: Vec<NaiveDate> = tasks
        .iter()
        .filter(|t| t.completed)
        .filter_map(|t| t.completed_at.map(|at| at.date_naive()))
        .collect();
    days.sort_unstable_by(|a, b| b.cmp(a));

    let mut streak = 0usize;
    for day in days {
        let offset = (today - day).num_days();
        let expected = i64::try_from(streak).unwrap_or(i64::MAX);

        if offset == expected {
            streak += 1;
        } else if offset > expected {
            break;
        }
    }

    streak
}

/// Longest window `completions_per_day` will report.
pub const MAX_WINDOW_DAYS: usize = 366;

/// Completions per day for the `days` days ending on `as_of`, oldest first.
///
/// Windows longer than [`MAX_WINDOW_DAYS`] are cut to that length.
#[must_use]
pub fn completions_per_day(tasks: &[Task], as_of: DateTime<Utc>, days: usize) -> Vec<usize> {
    let today = as_of.date_naive();
    let days = days.min(MAX_WINDOW_DAYS);
    let mut counts = vec![0usize; days];

    for completed_at in tasks.iter().filter(|t| t.completed).filter_map(|t| t.completed_at) {
        let offset = (today - completed_at.date_naive()).num_days();
        if let Ok(offset) = usize::try_from(offset) {
            if offset < days {
                counts[days - 1 - offset] += 1;
            }
        }
    }

    counts
}
