//! Storage layer for cadence.
//!
//! This module provides SQLite-based persistence for:
//! - Tasks
//! - Cached per-user statistics snapshots

mod database;
mod migrations;
mod snapshots;
mod tasks;

pub use database::Database;
pub use snapshots::SnapshotCache;
pub use tasks::TaskStore;
