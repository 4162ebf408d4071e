//! Task data model.
//!
//! Types for tasks, their recurrence rules and reminders, plus the inputs
//! used to create, edit and filter them.

mod input;
mod query;
mod types;

pub use input::{NewTask, RecurrenceRule, TaskDefaults, TaskPatch};
pub use query::{sort_by_due, TaskQuery};
pub use types::{Priority, Recurrence, RecurrenceKind, Reminder, Task, DEFAULT_CATEGORY};
