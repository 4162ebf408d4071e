//! Configuration management for cadence.
//!
//! This module handles loading configuration from `~/.cadence/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, GeneralConfig, TasksConfig};
