//! Debug event logging for task list mutations.
//!
//! When `debug_logging` is enabled in the config, every mutation of the task
//! list is appended as a JSONL line to `events.jsonl` in the data directory.
//! This allows debugging what happened to a list by inspecting the events.

use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Log file name within the data directory.
pub const EVENTS_FILE: &str = "events.jsonl";

/// Append-only JSONL log of store operations.
///
/// Errors are silently ignored; logging never breaks a store operation.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// Log to a specific file.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Log to `events.jsonl` in `data_dir`.
    #[must_use]
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(EVENTS_FILE))
    }

    /// Get the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event.
    pub fn record(&self, operation: &str, task_id: Option<&str>, details: Option<&str>) {
        if let Some(parent) = self.path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }

        let entry = json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "operation": operation,
            "task_id": task_id,
            "details": details,
        });

        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) else {
            return;
        };

        let _ = writeln!(file, "{entry}");
    }
}
