//! Task management.
//!
//! This module provides the task list core:
//! - Tasks with text, priority, completion state and timestamps
//! - Filtered and sorted views and aggregate statistics
//! - Persistence of the whole list to a storage slot
//! - JSON export and destructive import
//!
//! # Example
//!
//! ```no_run
//! use tasklist::storage::FileSlot;
//! use tasklist::tasks::{FilterMode, Priority, SortMode, TaskStore};
//!
//! let mut store = TaskStore::open(FileSlot::new("/tmp/tasks.json"));
//!
//! let task = store.add("Buy milk", Priority::Low).unwrap();
//! store.toggle_complete(&task.id).unwrap();
//!
//! store.set_filter(FilterMode::Pending);
//! store.set_sort(SortMode::Priority);
//! for task in store.query() {
//!     println!("{} {}", task.id, task.text);
//! }
//!
//! let stats = store.stats();
//! println!("{}% complete", stats.completion_rate);
//! ```

pub mod id;
pub mod models;
pub mod query;
pub mod snapshot;
pub mod store;

pub use models::{FilterMode, Priority, PriorityCounts, SortMode, Stats, Task};
pub use store::TaskStore;

use crate::storage::FileSlot;
use std::path::Path;

/// Open a store backed by the JSON file at `path`.
pub fn open_file_store(path: &Path) -> TaskStore<FileSlot> {
    TaskStore::open(FileSlot::new(path))
}

/// Count pending tasks in the JSON file at `path`.
///
/// Returns 0 if the file doesn't exist or cannot be parsed.
#[must_use]
pub fn count_pending(path: &Path) -> usize {
    if !path.exists() {
        return 0;
    }
    open_file_store(path).stats().pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = open_file_store(&path);
        assert!(store.is_empty());
        let task = store.add("Persist me", Priority::High).unwrap();

        let reopened = open_file_store(&path);
        assert_eq!(reopened.get(&task.id), Some(&task));
    }

    #[test]
    fn test_count_pending_no_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(count_pending(&dir.path().join("tasks.json")), 0);
    }

    #[test]
    fn test_count_pending_with_tasks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = open_file_store(&path);
        let a = store.add("Task 1", Priority::High).unwrap();
        store.add("Task 2", Priority::Medium).unwrap();
        store.toggle_complete(&a.id).unwrap();

        assert_eq!(count_pending(&path), 1);
    }

    #[test]
    fn test_count_pending_corrupted_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "this is not a task list").unwrap();

        assert_eq!(count_pending(&path), 0);
    }
}
