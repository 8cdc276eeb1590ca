//! Serialized form of the task list.
//!
//! The same JSON array is used for the storage slot, for export and for
//! import:
//!
//! ```json
//! [
//!   {
//!     "id": "buy-milk-3fa2c1d0",
//!     "text": "Buy milk",
//!     "priority": "low",
//!     "completed": true,
//!     "createdAt": "2024-01-01T09:00:00Z",
//!     "completedAt": "2024-01-01T18:30:00Z"
//!   }
//! ]
//! ```

use crate::error::{Error, Result};
use crate::tasks::models::Task;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Serialize tasks as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Parse and validate a serialized task list.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if `data` is not JSON, is not an array,
/// contains a record that is not a task, or breaks a task invariant
/// (empty text, duplicate id, `completedAt` not matching `completed`).
pub fn parse(data: &str) -> Result<Vec<Task>> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| Error::InvalidFormat(format!("not valid JSON: {e}")))?;

    if !value.is_array() {
        return Err(Error::InvalidFormat("expected an array of tasks".to_string()));
    }

    let tasks: Vec<Task> = serde_json::from_value(value)
        .map_err(|e| Error::InvalidFormat(format!("not a task record: {e}")))?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        task.validate()?;
        if !seen.insert(task.id.as_str()) {
            return Err(Error::InvalidFormat(format!("duplicate task id: {}", task.id)));
        }
    }

    Ok(tasks)
}

/// Default file name for an export made on `date`: `tasks-YYYY-MM-DD.json`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("tasks-{}.json", date.format("%Y-%m-%d"))
}
