//! Statistics module.
//!
//! Computes the per-user statistics snapshot:
//! - Completion rate and counts
//! - Category distribution
//! - Daily completion streak
//!
//! Also renders the terminal charts shown by `cadence stats`.

mod snapshot;
mod streak;
mod visualization;

pub use snapshot::StatisticsSnapshot;
pub use streak::{completions_per_day, current_streak, MAX_WINDOW_DAYS};
pub use visualization::{render_bar_chart, render_sparkline};
