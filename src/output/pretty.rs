use colored::Colorize;

use crate::features::board::BoardState;
use crate::features::stats::{render_bar_chart, render_sparkline, StatisticsSnapshot};
use crate::service::Created;
use crate::tasks::{Priority, Task};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn status_icon(task: &Task) -> colored::ColoredString {
    if task.completed {
        "[x]".green()
    } else {
        "[ ]".white()
    }
}

fn priority_marker(priority: Priority) -> colored::ColoredString {
    match priority {
        Priority::High => "!high".red(),
        Priority::Medium => "!medium".yellow(),
        Priority::Low => "!low".dimmed(),
    }
}

/// One-line summary of a task.
fn task_line(task: &Task) -> String {
    let title = if task.completed {
        task.title.strikethrough().to_string()
    } else {
        task.title.bold().to_string()
    };

    let mut line = format!("{} {}", status_icon(task), title);

    if let Some(due) = &task.due_date {
        line.push_str(&format!("  {}", due.format(DATE_FORMAT).to_string().yellow()));
    }

    line.push_str(&format!("  {}", priority_marker(task.priority)));
    line.push_str(&format!("  {}", format!("@{}", task.category).dimmed()));

    if !task.labels.is_empty() {
        let labels = task
            .labels
            .iter()
            .map(|l| format!("#{l}"))
            .collect::<Vec<_>>()
            .join(" ");
        line.push_str(&format!("  {}", labels.cyan()));
    }

    if let Some(recurrence) = &task.recurrence {
        line.push_str(&format!("  {}", format!("↻ {}", recurrence.kind).magenta()));
    }

    line.push_str(&format!("  {}", task.id.dimmed()));
    line
}

/// Format a list of tasks as a pretty table.
pub fn format_tasks_pretty(tasks: &[Task], title: &str) -> String {
    if tasks.is_empty() {
        return format!("{title} (0 items)\n  No items");
    }

    let mut output = format!("{} ({} items)\n", title, tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        output.push_str(&task_line(task));
        output.push('\n');
    }

    output
}

/// Format a board: the tasks its filter admits plus the open-task count.
pub fn format_board_pretty(board: &BoardState, title: &str) -> String {
    let visible: Vec<Task> = board.visible().into_iter().cloned().collect();
    let heading = format!("{title} [{}]", board.filter.as_str());

    let mut output = format_tasks_pretty(&visible, &heading);
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str(&board.items_left_label().dimmed().to_string());
    output
}

/// Format a single task with all of its fields.
pub fn format_task_pretty(task: &Task, instances: &[Task]) -> String {
    let mut output = format!("{} {}\n", status_icon(task), task.title.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), task.id));
    output.push_str(&format!(
        "  {}: {}\n",
        "Status".dimmed(),
        if task.completed { "completed" } else { "open" }
    ));

    if let Some(description) = &task.description {
        output.push_str(&format!("  {}: {}\n", "Description".dimmed(), description));
    }

    if let Some(due) = &task.due_date {
        output.push_str(&format!("  {}: {}\n", "Due".dimmed(), due.format(TIMESTAMP_FORMAT)));
    }

    output.push_str(&format!("  {}: {}\n", "Priority".dimmed(), task.priority));
    output.push_str(&format!("  {}: {}\n", "Category".dimmed(), task.category));

    if !task.labels.is_empty() {
        let labels: Vec<&str> = task.labels.iter().map(String::as_str).collect();
        output.push_str(&format!("  {}: {}\n", "Labels".dimmed(), labels.join(", ")));
    }

    if task.progress > 0 {
        output.push_str(&format!("  {}: {}%\n", "Progress".dimmed(), task.progress));
    }

    if let Some(recurrence) = &task.recurrence {
        output.push_str(&format!(
            "  {}: every {} x {} until {}\n",
            "Repeats".dimmed(),
            recurrence.interval,
            recurrence.kind,
            recurrence.end_date.format(DATE_FORMAT)
        ));
        output.push_str(&format!("  {}: {}\n", "Instances".dimmed(), instances.len()));
    }

    if let Some(parent) = &task.parent_task_id {
        output.push_str(&format!("  {}: {}\n", "Repeats from".dimmed(), parent));
    }

    if let Some(reminder) = task.reminder.as_ref().filter(|r| r.enabled) {
        if let Some(time) = reminder.time {
            let state = if reminder.notified { " (sent)" } else { "" };
            output.push_str(&format!(
                "  {}: {}{}\n",
                "Reminder".dimmed(),
                time.format(TIMESTAMP_FORMAT),
                state
            ));
        }
    }

    if let Some(completed_at) = &task.completed_at {
        output.push_str(&format!(
            "  {}: {}\n",
            "Completed".dimmed(),
            completed_at.format(TIMESTAMP_FORMAT)
        ));
    }

    output.push_str(&format!(
        "  {}: {}\n",
        "Created".dimmed(),
        task.created_at.format(TIMESTAMP_FORMAT)
    ));

    output
}

/// Confirmation for a newly created task.
pub fn format_created_pretty(created: &Created) -> String {
    let mut output = format!(
        "Created task: {} (ID: {})",
        created.task.title, created.task.id
    );

    if created.task.is_recurring() {
        let count = created.instances.len();
        let plural = if count == 1 { "" } else { "s" };
        output.push_str(&format!("\n  Generated {count} occurrence{plural}"));
        if let (Some(first), Some(last)) = (created.instances.first(), created.instances.last()) {
            if let (Some(from), Some(to)) = (first.due_date, last.due_date) {
                output.push_str(&format!(
                    " from {} to {}",
                    from.format(DATE_FORMAT),
                    to.format(DATE_FORMAT)
                ));
            }
        }
    }

    output
}

/// Statistics summary with a category chart and recent activity.
pub fn format_statistics_pretty(snapshot: &StatisticsSnapshot, recent: &[usize]) -> String {
    let mut output = Vec::new();

    output.push("STATISTICS".bold().to_string());
    output.push("─".repeat(50));
    output.push(format!(
        "  Total: {}  Completed: {}  Open: {}",
        snapshot.total_tasks,
        snapshot.completed_tasks.to_string().green(),
        snapshot.open_tasks().to_string().yellow()
    ));
    output.push(format!(
        "  Completion rate: {}%",
        snapshot.completion_rate.to_string().cyan()
    ));

    let streak = snapshot.streak;
    let days = if streak == 1 { "day" } else { "days" };
    let streak_text = format!("{streak} {days}");
    output.push(format!(
        "  Current streak: {}",
        if streak > 0 {
            streak_text.green().to_string()
        } else {
            streak_text
        }
    ));

    if !snapshot.category_distribution.is_empty() {
        output.push(String::new());
        output.push("BY CATEGORY".bold().to_string());
        output.push("─".repeat(50));
        let data: Vec<(String, usize)> = snapshot
            .category_distribution
            .iter()
            .map(|(category, count)| (category.clone(), *count))
            .collect();
        output.push(render_bar_chart(&data, 16, 30));
    }

    if !recent.is_empty() {
        output.push(String::new());
        output.push(format!(
            "  Last {} days: {}",
            recent.len(),
            render_sparkline(recent).green()
        ));
    }

    output.push(String::new());
    output.push(
        format!(
            "  Updated {}",
            snapshot.last_updated.format(TIMESTAMP_FORMAT)
        )
        .dimmed()
        .to_string(),
    );

    output.join("\n")
}

/// Reminders that just fired.
pub fn format_reminders_pretty(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No reminders due".to_string();
    }

    let mut output = format!("Reminders ({})\n", tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let time = task
            .reminder
            .as_ref()
            .and_then(|r| r.time)
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();
        output.push_str(&format!("{} {}  {}\n", "⏰".yellow(), task.title.bold(), time.dimmed()));
    }

    output
}
