//! Command-line interface for cadence.

pub mod args;
pub mod commands;
