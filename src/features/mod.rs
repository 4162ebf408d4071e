//! Feature implementations for cadence.
//!
//! - Recurring task expansion
//! - Statistics snapshots and streaks
//! - Reminder sweeps
//! - List view state

pub mod board;
pub mod recurrence;
pub mod reminders;
pub mod stats;
