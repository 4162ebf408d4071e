//! cadence - tasks, recurrence and completion streaks
//!
//! This crate provides a command-line task list backed by SQLite. Recurring
//! tasks are expanded into dated instances when created, and a per-user
//! statistics snapshot (completion rate, category distribution, daily
//! streak) is recomputed after every change.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod service;
pub mod storage;
pub mod tasks;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::CadenceError;
pub use service::{Created, TaskService};
