//! Recurring task expansion.
//!
//! Turns a template task carrying a recurrence rule into the concrete
//! instances that get stored alongside it.

mod expander;

pub use expander::{expand, MAX_INSTANCES};
