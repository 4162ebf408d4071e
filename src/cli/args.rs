use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::features::board::BoardFilter;
use crate::tasks::{Priority, RecurrenceKind};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "A task list with recurring tasks, reminders and completion streaks")]
#[command(long_about = "cadence - tasks, recurrence and streaks from the command line

Tasks live in a local SQLite database. Recurring tasks are expanded into
dated occurrences when they are created, and completion statistics are
kept up to date after every change.

QUICK START:
  cadence add \"Buy milk\" --due tomorrow
  cadence add \"Standup\" --due today --repeat daily --until \"in 2 weeks\"
  cadence list --filter active
  cadence complete <ID>
  cadence stats

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  cadence <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// User whose tasks to manage
    ///
    /// Defaults to `general.default_user` from the config file.
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Directory holding config.yaml and cadence.db
    #[arg(long, global = true, env = "CADENCE_HOME")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    ///
    /// A task with --repeat becomes a template: its occurrences are
    /// generated immediately, one per step from the due date up to
    /// --until (at most 90).
    ///
    /// # Examples
    ///
    ///   cadence add "Buy milk"
    ///   cadence add "File taxes" --due 2025-04-15 --priority high -c finance
    ///   cadence add "Standup" --due monday --repeat weekly --until "in 8 weeks"
    ///   cadence add "Call mom" --remind "tomorrow 18:00" -l family
    #[command(alias = "a")]
    Add(AddArgs),

    /// List tasks
    ///
    /// Tasks are ordered by due date; tasks without one come last.
    /// All filters combine with AND, except --label which matches any of
    /// the given labels.
    ///
    /// # Examples
    ///
    ///   cadence list
    ///   cadence list --filter active
    ///   cadence list --category work --priority high
    ///   cadence list --search "invoice|receipt"
    ///   cadence list --from today --to "in 7 days"
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show task details by ID
    Show {
        /// Task ID
        id: String,
    },

    /// Mark a task as complete
    #[command(alias = "done")]
    Complete {
        /// Task ID
        id: String,
    },

    /// Mark a completed task as open again
    Reopen {
        /// Task ID
        id: String,
    },

    /// Flip a task between open and complete
    Toggle {
        /// Task ID
        id: String,
    },

    /// Change fields of a task
    ///
    /// # Examples
    ///
    ///   cadence edit <ID> --title "Buy oat milk"
    ///   cadence edit <ID> --due friday --priority low
    ///   cadence edit <ID> --clear-due --progress 50
    Edit(EditArgs),

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task ID
        id: String,
    },

    /// Delete every completed task
    ClearCompleted,

    /// List tasks due in a calendar month
    ///
    /// # Examples
    ///
    ///   cadence calendar 2025 3
    #[command(alias = "cal")]
    Calendar {
        /// Year, e.g. 2025
        year: i32,
        /// Month, 1-12
        month: u32,
    },

    /// Show completion statistics
    ///
    /// Completion rate, per-category counts, the current daily streak and
    /// a sparkline of recent completions.
    Stats {
        /// Number of days of recent activity to show (1-366)
        #[arg(long, default_value = "14", value_parser = clap::value_parser!(u16).range(1..=366))]
        days: u16,
    },

    /// Show reminders that are due and mark them as sent
    ///
    /// Each reminder is reported once.
    Reminders,

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   cadence completions bash > ~/.local/share/bash-completion/completions/cadence
    ///   cadence completions zsh > ~/.zsh/completions/_cadence
    ///   cadence completions fish > ~/.config/fish/completions/cadence.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Due date (today, tomorrow, friday, "in 3 days", 2025-12-15, RFC 3339)
    #[arg(long)]
    pub due: Option<String>,

    /// Priority: low, medium or high
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Label (repeatable)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Repeat: daily, weekly, monthly or yearly
    #[arg(long, requires_all = ["due", "until"])]
    pub repeat: Option<RecurrenceKind>,

    /// Steps between occurrences, e.g. 2 with --repeat weekly for fortnightly
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    pub every: i64,

    /// Last date an occurrence may fall on
    #[arg(long, requires = "repeat")]
    pub until: Option<String>,

    /// Reminder time ("tomorrow 09:00", "2025-03-01 14:30", RFC 3339)
    #[arg(long)]
    pub remind: Option<String>,

    /// Progress percentage, 0-100
    #[arg(long)]
    pub progress: Option<u8>,
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// Show all, active or completed tasks
    #[arg(short, long, value_enum, default_value = "all")]
    pub filter: BoardFilter,

    /// Only tasks in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only tasks with this priority
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Only completed (true) or open (false) tasks
    #[arg(long)]
    pub completed: Option<bool>,

    /// Only tasks carrying any of these labels (repeatable)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Case-insensitive regex over title and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Due on or after this date
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Due on or before this date (a date alone includes the whole day)
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

#[derive(Args, Default)]
pub struct EditArgs {
    /// Task ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,

    /// New due date
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,

    /// New priority
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// New category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Replace labels (repeatable)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Remove all labels
    #[arg(long, conflicts_with = "labels")]
    pub clear_labels: bool,

    /// New reminder time
    #[arg(long, conflicts_with = "clear_reminder")]
    pub remind: Option<String>,

    /// Remove the reminder
    #[arg(long)]
    pub clear_reminder: bool,

    /// New progress percentage, 0-100
    #[arg(long)]
    pub progress: Option<u8>,
}
