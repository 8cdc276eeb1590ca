//! Derived views over a task list: filtering, sorting and statistics.
//!
//! Everything here is read-only over the tasks it is given.

use crate::tasks::models::{percent, FilterMode, Priority, PriorityCounts, SortMode, Stats, Task};
use icu_collator::{Collator, CollatorOptions, Strength};
use std::cmp::{Ordering, Reverse};

/// Case-insensitive, locale-aware ordering of task text.
///
/// Uses the root (language-neutral) collation at secondary strength, so
/// case is ignored while accents still break ties: "apple" < "Éclair" <
/// "fig" and "Apple" == "apple".
#[derive(Debug)]
pub struct TextOrder {
    collator: Option<Collator>,
}

impl TextOrder {
    /// Build the root collator.
    ///
    /// If collation data cannot be loaded the order falls back to comparing
    /// lowercased text.
    #[must_use]
    pub fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        Self { collator: Collator::try_new(&Default::default(), options).ok() }
    }

    /// Compare two texts.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    }
}

impl Default for TextOrder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort tasks in place. All modes are stable.
pub fn sort_tasks(tasks: &mut [Task], mode: SortMode) {
    match mode {
        SortMode::Newest => tasks.sort_by_key(|t| Reverse(t.created_at)),
        SortMode::Oldest => tasks.sort_by_key(|t| t.created_at),
        SortMode::Priority => tasks.sort_by_key(|t| Reverse(t.priority.weight())),
        SortMode::Alphabetical => {
            let order = TextOrder::new();
            tasks.sort_by(|a, b| order.compare(&a.text, &b.text));
        }
    }
}

/// Tasks passing `filter`, ordered by `sort`.
#[must_use]
pub fn filter_and_sort(tasks: &[Task], filter: FilterMode, sort: SortMode) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    sort_tasks(&mut selected, sort);
    selected
}

/// Aggregate counts over all of `tasks`.
#[must_use]
pub fn compute_stats(tasks: &[Task]) -> Stats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();

    let mut priority_counts = PriorityCounts::default();
    for task in tasks {
        match task.priority {
            Priority::High => priority_counts.high += 1,
            Priority::Medium => priority_counts.medium += 1,
            Priority::Low => priority_counts.low += 1,
        }
    }

    Stats {
        total,
        completed,
        pending: total - completed,
        completion_rate: percent(completed, total),
        priority_counts,
    }
}
