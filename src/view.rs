//! Presentation model for the task list.
//!
//! [`build_view`] turns the output of [`TaskStore::query`] and
//! [`TaskStore::stats`] into plain data that a front end can render without
//! knowing anything about tasks: labels, markers, formatted timestamps and
//! relative ages are all computed here.
//!
//! [`TaskStore::query`]: crate::tasks::TaskStore::query
//! [`TaskStore::stats`]: crate::tasks::TaskStore::stats

use crate::tasks::models::percent;
use crate::tasks::{FilterMode, Priority, SortMode, Stats, Task};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Format used for absolute timestamps.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format used for ages of a week or more.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One rendered task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    /// Task ID.
    pub id: String,
    /// Task text.
    pub text: String,
    /// Task priority.
    pub priority: Priority,
    /// "High", "Medium" or "Low".
    pub priority_label: &'static str,
    /// "[H]", "[M]" or "[L]".
    pub priority_marker: &'static str,
    /// Whether the task is completed.
    pub completed: bool,
    /// "Completed" or "In Progress".
    pub status: &'static str,
    /// Creation time.
    pub created: String,
    /// Completion time, if completed.
    pub completed_on: Option<String>,
    /// Last edit time, if edited.
    pub updated: Option<String>,
    /// Age of the task relative to the time the view was built.
    pub age: String,
}

/// The whole list as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    /// Active filter.
    pub filter: FilterMode,
    /// Active sort order.
    pub sort: SortMode,
    /// Visible tasks in display order.
    pub rows: Vec<TaskRow>,
    /// No rows to show under the current filter.
    pub empty: bool,
    /// Statistics over the whole list.
    pub stats: Stats,
    /// "N% Complete".
    pub progress: String,
}

/// Per-priority share of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityShare {
    /// The priority.
    pub priority: Priority,
    /// Its label.
    pub label: &'static str,
    /// Number of tasks with this priority.
    pub count: usize,
    /// Share of all tasks, rounded.
    pub percent: u32,
}

/// Statistics as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsView {
    /// Raw statistics.
    pub stats: Stats,
    /// "N% Complete".
    pub progress: String,
    /// One entry per priority, high first.
    pub shares: Vec<PriorityShare>,
}

/// Build the list view for `tasks`, which should already be filtered and
/// sorted.
#[must_use]
pub fn build_view(
    tasks: &[Task],
    stats: &Stats,
    filter: FilterMode,
    sort: SortMode,
    now: DateTime<Utc>,
) -> ListView {
    let rows: Vec<TaskRow> = tasks.iter().map(|task| task_row(task, now)).collect();
    ListView {
        filter,
        sort,
        empty: rows.is_empty(),
        rows,
        stats: *stats,
        progress: progress_line(stats),
    }
}

/// Build the statistics view.
#[must_use]
pub fn build_stats_view(stats: &Stats) -> StatsView {
    let shares = Priority::ALL
        .iter()
        .map(|&priority| {
            let count = stats.priority_counts.get(priority);
            PriorityShare {
                priority,
                label: priority.label(),
                count,
                percent: percent(count, stats.total),
            }
        })
        .collect();

    StatsView { stats: *stats, progress: progress_line(stats), shares }
}

/// Render one task.
#[must_use]
pub fn task_row(task: &Task, now: DateTime<Utc>) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        text: task.text.clone(),
        priority: task.priority,
        priority_label: task.priority.label(),
        priority_marker: priority_marker(task.priority),
        completed: task.completed,
        status: if task.completed { "Completed" } else { "In Progress" },
        created: format_timestamp(task.created_at),
        completed_on: task.completed_at.map(format_timestamp),
        updated: task.updated_at.map(format_timestamp),
        age: relative_age(task.created_at, now),
    }
}

/// Short marker for a priority.
#[must_use]
pub const fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "[H]",
        Priority::Medium => "[M]",
        Priority::Low => "[L]",
    }
}

/// "N% Complete".
#[must_use]
pub fn progress_line(stats: &Stats) -> String {
    format!("{}% Complete", stats.completion_rate)
}

/// Format a timestamp as `YYYY-MM-DD HH:MM` (UTC).
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Describe how long ago `then` was.
///
/// Under a minute is "Just now", then minutes, hours and days up to a week.
/// Anything older is shown as its date. Times in the future count as now.
#[must_use]
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if elapsed.num_seconds() < 60 {
        "Just now".to_string()
    } else if hours < 1 {
        format!("{minutes}m ago")
    } else if days < 1 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        then.format(DATE_FORMAT).to_string()
    }
}
