//! Task model types for the task list.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// High priority.
    High,
    /// Medium priority (default).
    #[default]
    Medium,
    /// Low priority.
    Low,
}

impl Priority {
    /// All priorities, most important first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Human-readable label (`High`, `Medium`, `Low`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Sort weight; a larger weight sorts first under [`SortMode::Priority`].
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(Error::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which tasks a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every task.
    #[default]
    All,
    /// Tasks that are not completed.
    Pending,
    /// Completed tasks.
    Completed,
}

impl FilterMode {
    /// Get the string representation of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Whether a task passes this filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl FromStr for FilterMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(Error::InvalidFilter(s.to_string())),
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordering applied to the filtered tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// High, then medium, then low.
    Priority,
    /// By text, ignoring case, in locale-aware (root collation) order.
    Alphabetical,
}

impl SortMode {
    /// Get the string representation of the sort mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Priority => "priority",
            Self::Alphabetical => "alphabetical",
        }
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "priority" => Ok(Self::Priority),
            "alphabetical" => Ok(Self::Alphabetical),
            _ => Err(Error::InvalidSort(s.to_string())),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (slug from text + random hex suffix).
    pub id: String,
    /// The task title, trimmed and never empty.
    pub text: String,
    /// Priority level.
    pub priority: Priority,
    /// Whether the task is done.
    pub completed: bool,
    /// When the task was created. Never changes.
    pub created_at: DateTime<Utc>,
    /// When the task was completed; present iff `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the text or priority was last edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Check the invariants a stored task must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] describing the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidFormat("task with empty id".to_string()));
        }
        if self.text.trim().is_empty() {
            return Err(Error::InvalidFormat(format!("task {} has empty text", self.id)));
        }
        if self.completed != self.completed_at.is_some() {
            return Err(Error::InvalidFormat(format!(
                "task {} has completed={} but completedAt is {}",
                self.id,
                self.completed,
                if self.completed_at.is_some() { "set" } else { "missing" }
            )));
        }
        Ok(())
    }
}

/// Number of tasks per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    /// Tasks with [`Priority::High`].
    pub high: usize,
    /// Tasks with [`Priority::Medium`].
    pub medium: usize,
    /// Tasks with [`Priority::Low`].
    pub low: usize,
}

impl PriorityCounts {
    /// Count for one priority.
    #[must_use]
    pub const fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Aggregate counts over the whole task list, ignoring the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// All tasks.
    pub total: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Tasks still pending.
    pub pending: usize,
    /// `round(100 * completed / total)`, 0 for an empty list.
    pub completion_rate: u32,
    /// Tasks per priority.
    pub priority_counts: PriorityCounts,
}

/// Percentage of `part` in `total`, rounded half up. 0 when `total` is 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // part <= total, so the result is at most 100
    ((part * 100 + total / 2) / total) as u32
}
