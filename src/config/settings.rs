//! Configuration settings for cadence.
//!
//! Settings are loaded from `~/.cadence/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::CadenceError;
use crate::tasks::{Priority, TaskDefaults, DEFAULT_CATEGORY};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Defaults for new tasks.
    pub tasks: TasksConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
    /// Log filter used when `CADENCE_LOG` is unset (e.g. `info`, `cadence=debug`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// User whose tasks are managed when `--user` is not given.
    #[serde(default = "default_user")]
    pub default_user: String,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply the setting to the global `colored` state.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Defaults applied to new tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Category for tasks created without one.
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Priority for tasks created without one.
    #[serde(default)]
    pub default_priority: Priority,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
            log_level: default_log_level(),
            default_user: default_user(),
        }
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            default_priority: Priority::default(),
        }
    }
}

impl TasksConfig {
    #[must_use]
    pub fn defaults(&self) -> TaskDefaults {
        TaskDefaults {
            category: self.default_category.clone(),
            priority: self.default_priority,
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, CadenceError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CadenceError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            CadenceError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), CadenceError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| CadenceError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            CadenceError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
