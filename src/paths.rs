//! Path utilities for determining data storage locations.
//!
//! Data is stored in `~/.tasklist/` by default:
//!
//! ```text
//! ~/.tasklist/
//!   config.yaml     optional settings
//!   tasks.json      the task list
//!   events.jsonl    mutation log, when debug logging is on
//!   templates/      optional overrides for the text views
//! ```

use std::path::{Path, PathBuf};

/// The base directory name for tasklist data.
const DATA_DIR_NAME: &str = ".tasklist";

/// The task list filename.
pub const TASKS_FILENAME: &str = "tasks.json";

/// The config filename.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Directory holding template overrides.
pub const TEMPLATES_DIRNAME: &str = "templates";

/// Get the base data directory.
///
/// Returns `~/.tasklist/` or `None` if the home directory cannot be
/// determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Default task list path inside `data_dir`.
#[must_use]
pub fn tasks_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TASKS_FILENAME)
}

/// Config file path inside `data_dir`.
#[must_use]
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILENAME)
}

/// Template override directory inside `data_dir`.
#[must_use]
pub fn templates_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(TEMPLATES_DIRNAME)
}

/// Resolve a configured path: absolute paths are kept, relative ones are
/// taken relative to `data_dir`.
#[must_use]
pub fn resolve(data_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}
